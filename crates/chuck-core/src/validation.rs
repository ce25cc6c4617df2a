//! Input rules for login and registration

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length at registration, in UTF-16 code units
pub const MIN_PASSWORD_LENGTH: usize = 6;

// local-part "@" label ("." label)+
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is a valid regex")
});

/// Whether `email` has the basic `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Whether `password` meets the registration length rule
pub fn meets_min_length(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for email in ["a@b.com", "first.last+tag@example.co.uk", "x_y%z-1@sub-domain.io"] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in ["", "plain", "a@b", "@b.com", "a@.com", "a@b.", "a b@c.com", "a@b.com ", "a@@b.com"] {
            assert!(!is_valid_email(email), "{email:?} should be invalid");
        }
    }

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        assert!(!meets_min_length("12345"));
        assert!(meets_min_length("123456"));
        assert!(meets_min_length("ççççöö"));
        // Each emoji is a surrogate pair
        assert!(meets_min_length("😀😀😀"));
        assert!(!meets_min_length("😀😀"));
    }
}
