//! Form-number canonicalization.
//!
//! The picklist endpoint does fuzzy server-side matching, so the same
//! form may be printed as "1040-SR", "1040 SR" or "1040sr" across rows.
//! Rows are compared on a canonical key: every character that is not an
//! ASCII letter or digit is stripped and the remainder is lowercased.

use regex::Regex;
use std::sync::OnceLock;

static NON_ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();

fn non_alphanumeric() -> &'static Regex {
    NON_ALPHANUMERIC.get_or_init(|| Regex::new(r"[^A-Za-z0-9]").expect("valid pattern"))
}

/// Canonical key for a form number: non-alphanumerics stripped, lowercased
pub fn canonical(value: &str) -> String {
    non_alphanumeric().replace_all(value, "").to_lowercase()
}

/// Compare two form numbers for canonical equality
///
/// Case- and punctuation-insensitive: "1040-SR" equals "1040sr".
pub fn equal(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strips_and_lowercases() {
        assert_eq!(canonical("Form 1040-SR"), "form1040sr");
        assert_eq!(canonical("1040"), "1040");
        assert_eq!(canonical(""), "");
    }

    #[test]
    fn test_equal_is_case_and_punctuation_insensitive() {
        assert!(equal("1040-SR", "1040sr"));
        assert!(equal("Form W-2", "form w2"));
        assert!(equal("1040", "10 40"));
    }

    #[test]
    fn test_equal_is_reflexive_and_symmetric() {
        assert!(equal("1099-MISC", "1099-MISC"));
        assert_eq!(equal("1099-MISC", "1099misc"), equal("1099misc", "1099-MISC"));
    }

    #[test]
    fn test_distinct_numbers_are_not_equal() {
        assert!(!equal("1040", "1041"));
        assert!(!equal("1040", "1040-SR"));
    }
}
