//! Syntactic email validation for the capture step.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld` shape: at least one non-whitespace, non-`@` char
/// before the `@`, at least one between the `@` and a dot, and at least
/// one after the last dot. Syntax only — no deliverability check.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email regex is valid")
});

/// Check whether `text` looks like an email address.
pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text.trim())
}
