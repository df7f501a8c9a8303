//! Branch name checks
//!
//! Names arrive from chat and end up as git arguments, so anything that
//! could be read as an option or a revision expression is refused.

use regex::Regex;
use std::sync::LazyLock;

/// Characters git refuses anywhere in a ref: controls, space, DEL and `~ ^ : ? * [ \`
static FORBIDDEN_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x20\x7f~^:?*\[\\]")
        .unwrap_or_else(|e| panic!("invalid branch regex: {e}"))
});

/// Check if a name is safe to hand to git as a branch
///
/// Follows `git check-ref-format --branch`, so `user@topic`, `fix#12` and
/// non-ASCII names pass. On top of that a leading `-` is refused because it
/// would be parsed as an option.
pub fn is_valid_branch_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 255 || name == "@" {
        return false;
    }
    if name.starts_with('-') || name.starts_with('/') {
        return false;
    }
    if name.ends_with('/') || name.ends_with('.') {
        return false;
    }
    if name.contains("..") || name.contains("//") || name.contains("@{") {
        return false;
    }
    if name
        .split('/')
        .any(|component| component.starts_with('.') || component.ends_with(".lock"))
    {
        return false;
    }
    !FORBIDDEN_CHARS.is_match(name)
}
