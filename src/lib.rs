pub mod core;
pub mod permissions;
pub mod scope;

// Structural settings validation
pub mod validation;

// Logging bootstrap for binaries and integration harnesses
pub mod logging;
