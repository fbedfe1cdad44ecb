//! Shared text utilities.

/// Keep only the ASCII digits of a string.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}
