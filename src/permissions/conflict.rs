//! Allow/deny rule conflict detection
//!
//! Works on rule source text so validators can flag conflicts without
//! building an engine. Two rules conflict when an allow and a deny can
//! cover the same invocations of the same tool.

/// Tool name portion of rule source text (text before the first paren)
fn rule_tool(text: &str) -> &str {
    text.split('(').next().unwrap_or(text)
}

/// Pattern portion of rule source text (inside the outermost parens)
fn rule_pattern(text: &str) -> &str {
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => &text[open + 1..close],
        _ => "",
    }
}

/// Stem a wildcard pattern down to its literal part
///
/// `git:*` stems to `git`, the same prefix the command matcher uses;
/// any other wildcard pattern just drops its `*` characters.
fn wildcard_stem(pattern: &str) -> String {
    if let Some(stem) = pattern.strip_suffix(":*") {
        return stem.to_string();
    }
    pattern.replace('*', "")
}

/// Whether an allow rule and a deny rule overlap
///
/// Rules for different tools never conflict. A bare `*` pattern
/// subsumes everything for its tool. Two wildcard patterns conflict
/// when either stem is a prefix of the other; otherwise only exact
/// pattern equality conflicts.
pub fn rules_conflict(allow: &str, deny: &str) -> bool {
    if rule_tool(allow) != rule_tool(deny) {
        return false;
    }

    let allow_pattern = rule_pattern(allow);
    let deny_pattern = rule_pattern(deny);

    if allow_pattern == "*" || deny_pattern == "*" {
        return true;
    }

    if allow_pattern.contains('*') && deny_pattern.contains('*') {
        let allow_stem = wildcard_stem(allow_pattern);
        let deny_stem = wildcard_stem(deny_pattern);
        return deny_stem.starts_with(&allow_stem) || allow_stem.starts_with(&deny_stem);
    }

    allow_pattern == deny_pattern
}
