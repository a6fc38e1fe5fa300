//! Live input filtering for front-ends.

use crate::constants::GUESS_LEN;

/// Strip non-digits and keep at most the first three digits.
///
/// Applied as the user types; nothing is rejected, offending characters just
/// disappear.
pub fn sanitize_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(GUESS_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_and_truncates() {
        assert_eq!(sanitize_input("1a2b3c4"), "123");
        assert_eq!(sanitize_input("  42 "), "42");
        assert_eq!(sanitize_input("abc"), "");
        assert_eq!(sanitize_input("9876"), "987");
        assert_eq!(sanitize_input("-1.5"), "15");
    }

    #[test]
    fn test_non_ascii_digits_dropped() {
        assert_eq!(sanitize_input("١٢٣7"), "7");
    }
}
