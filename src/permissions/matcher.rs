//! Tool-specific argument matchers
//!
//! Maps a rule pattern against the arguments of a tool call. Dispatch
//! goes through a capability table keyed by tool name; supporting a new
//! tool's argument shape is a table entry, not a new branch.

use regex::Regex;
use serde_json::{Map, Value};

/// Matches one rule pattern against a call's argument map
type ArgMatcher = fn(&str, &Map<String, Value>) -> bool;

/// Tools with content-level pattern matching
const MATCHERS: &[(&str, ArgMatcher)] = &[
    ("Bash", match_command_args),
    ("Read", match_file_args),
    ("Edit", match_file_args),
    ("Write", match_file_args),
    ("WebFetch", match_url_args),
];

/// Check a pattern against a tool call's arguments
///
/// Tools without an entry in the matcher table match on tool name
/// alone; a pattern on such a rule is not inspected further.
pub fn pattern_matches(tool: &str, pattern: &str, args: &Map<String, Value>) -> bool {
    match MATCHERS.iter().find(|(name, _)| *name == tool) {
        Some((_, matcher)) => matcher(pattern, args),
        None => true,
    }
}

/// Three-tier text pattern match
///
/// - `prefix:*` does a prefix match (`git:*` matches `git push`)
/// - a pattern containing `*` anywhere else is a wildcard match over
///   the whole text, each `*` standing for any substring
/// - anything else requires exact equality
pub fn match_text_pattern(pattern: &str, text: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix(":*") {
        return text.starts_with(prefix);
    }

    if pattern.contains('*') {
        return wildcard_matches(pattern, text);
    }

    text == pattern
}

/// Anchored wildcard match; non-star segments match literally
fn wildcard_matches(pattern: &str, text: &str) -> bool {
    let stems: Vec<String> = pattern.split('*').map(|s| regex::escape(s)).collect();
    let source = format!("^{}$", stems.join(".*"));

    Regex::new(&source)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn match_command_args(pattern: &str, args: &Map<String, Value>) -> bool {
    let command = str_arg(args, &["command"]);
    match_text_pattern(pattern, command)
}

fn match_file_args(pattern: &str, args: &Map<String, Value>) -> bool {
    let path = str_arg(args, &["file_path", "filePath", "path"]);
    match_text_pattern(pattern, path)
}

/// URLs are loosely matched: containment in either direction
fn match_url_args(pattern: &str, args: &Map<String, Value>) -> bool {
    let url = str_arg(args, &["url"]);
    pattern.contains(url) || url.contains(pattern)
}

/// First present string argument among the candidate keys
fn str_arg<'a>(args: &'a Map<String, Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| args.get(*key).and_then(Value::as_str))
        .unwrap_or("")
}
