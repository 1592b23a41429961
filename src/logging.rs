//! Logging bootstrap
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! the consumer's job. Binaries and integration harnesses that don't
//! want to wire one up themselves can call [`init`] once at startup.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a formatted global subscriber once
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g.
/// `"claude_devtools_core=info"`) is used. Calling again is a no-op.
pub fn init(default_directive: &str) {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // try_init: a subscriber installed by the host application wins
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
