#![forbid(unsafe_code)]

//! Field rules, independent of any document.

use std::fmt;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::messages::{
    self, EMAIL_INVALID, EMAIL_REQUIRED, MESSAGE_REQUIRED, MESSAGE_TOO_SHORT, NAME_REQUIRED,
    NAME_TOO_SHORT,
};

/// Accepts `local@domain.tld` with no whitespace and exactly one `@`.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// The three validated fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Name,
    Email,
    Message,
}

impl FieldKind {
    /// All fields in the order errors are reported and focused.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Email => 1,
            Self::Message => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value failed its field's rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooShort { min: usize },
    InvalidEmail,
}

impl FieldError {
    /// Render the user-facing message for this error on `field`.
    #[must_use]
    pub fn message(self, field: FieldKind, text: &messages::Messages) -> String {
        match (field, self) {
            (FieldKind::Name, Self::Required) => text.text(NAME_REQUIRED),
            (FieldKind::Email, Self::Required) => text.text(EMAIL_REQUIRED),
            (FieldKind::Message, Self::Required) => text.text(MESSAGE_REQUIRED),
            (FieldKind::Name, Self::TooShort { min }) => {
                text.format(NAME_TOO_SHORT, &[("min", &min.to_string())])
            }
            (FieldKind::Message, Self::TooShort { min }) => {
                text.format(MESSAGE_TOO_SHORT, &[("min", &min.to_string())])
            }
            (FieldKind::Email, Self::TooShort { .. }) | (_, Self::InvalidEmail) => {
                text.text(EMAIL_INVALID)
            }
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::TooShort { min } => write!(f, "shorter than {min} characters"),
            Self::InvalidEmail => f.write_str("not an email address"),
        }
    }
}

impl std::error::Error for FieldError {}

/// Thresholds and patterns for the three fields.
///
/// Values are trimmed before any check. Lengths count grapheme clusters, so
/// `"Zoë"` is three characters however it is encoded.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub name_min: usize,
    pub message_min: usize,
    email: Regex,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            name_min: 2,
            message_min: 10,
            email: default_email_regex(),
        }
    }
}

fn default_email_regex() -> Regex {
    Regex::new(DEFAULT_EMAIL_PATTERN).expect("email regex")
}

impl ValidationRules {
    /// Set the minimum name length.
    #[must_use]
    pub fn name_min(mut self, min: usize) -> Self {
        self.name_min = min;
        self
    }

    /// Set the minimum message length.
    #[must_use]
    pub fn message_min(mut self, min: usize) -> Self {
        self.message_min = min;
        self
    }

    /// Replace the email pattern.
    pub fn email_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.email = Regex::new(pattern)?;
        Ok(self)
    }

    #[must_use]
    pub fn email_regex(&self) -> &Regex {
        &self.email
    }

    /// Check `value` against the rule for `field`.
    pub fn check(&self, field: FieldKind, value: &str) -> Result<(), FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FieldError::Required);
        }
        match field {
            FieldKind::Name => min_length(value, self.name_min),
            FieldKind::Email if !self.email.is_match(value) => Err(FieldError::InvalidEmail),
            FieldKind::Email => Ok(()),
            FieldKind::Message => min_length(value, self.message_min),
        }
    }
}

fn min_length(value: &str, min: usize) -> Result<(), FieldError> {
    if value.graphemes(true).count() < min {
        Err(FieldError::TooShort { min })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Messages;
    use proptest::prelude::*;

    #[test]
    fn empty_and_whitespace_are_required() {
        let rules = ValidationRules::default();
        for field in FieldKind::ALL {
            assert_eq!(rules.check(field, ""), Err(FieldError::Required));
            assert_eq!(rules.check(field, "  \t "), Err(FieldError::Required));
        }
    }

    #[test]
    fn name_length_boundary() {
        let rules = ValidationRules::default();
        assert_eq!(
            rules.check(FieldKind::Name, "A"),
            Err(FieldError::TooShort { min: 2 })
        );
        assert_eq!(rules.check(FieldKind::Name, "Al"), Ok(()));
        assert_eq!(
            rules.check(FieldKind::Name, " A "),
            Err(FieldError::TooShort { min: 2 })
        );
    }

    #[test]
    fn message_length_boundary() {
        let rules = ValidationRules::default();
        assert_eq!(
            rules.check(FieldKind::Message, "123456789"),
            Err(FieldError::TooShort { min: 10 })
        );
        assert_eq!(rules.check(FieldKind::Message, "1234567890"), Ok(()));
    }

    #[test]
    fn lengths_count_graphemes() {
        let rules = ValidationRules::default().name_min(3);
        assert_eq!(rules.check(FieldKind::Name, "Zoe\u{308}"), Ok(()));
        assert_eq!(
            rules.check(FieldKind::Name, "e\u{301}e\u{301}"),
            Err(FieldError::TooShort { min: 3 })
        );
    }

    #[test]
    fn email_shapes() {
        let rules = ValidationRules::default();
        for ok in ["a@b.co", "first.last@example.org", " user@host.io "] {
            assert_eq!(rules.check(FieldKind::Email, ok), Ok(()), "{ok}");
        }
        for bad in ["plain", "a@b", "@b.co", "a@.", "a b@c.de", "a@@b.co", "a@b@c.de"] {
            assert_eq!(
                rules.check(FieldKind::Email, bad),
                Err(FieldError::InvalidEmail),
                "{bad}"
            );
        }
    }

    #[test]
    fn custom_email_pattern() {
        let rules = ValidationRules::default()
            .email_pattern(r"@example\.com$")
            .unwrap();
        assert_eq!(rules.check(FieldKind::Email, "x@example.com"), Ok(()));
        assert!(ValidationRules::default().email_pattern("(").is_err());
    }

    #[test]
    fn messages_per_field() {
        let m = Messages::english();
        assert_eq!(
            FieldError::TooShort { min: 10 }.message(FieldKind::Message, &m),
            "Message must be at least 10 characters long."
        );
        assert_eq!(
            FieldError::Required.message(FieldKind::Email, &m),
            "Please enter your email address."
        );
        assert_ne!(
            FieldError::Required.message(FieldKind::Name, &m),
            FieldError::Required.message(FieldKind::Message, &m)
        );
    }

    proptest! {
        #[test]
        fn padding_never_changes_outcome(
            core in "[a-zA-Z@. ]{0,16}",
            left in " {0,3}",
            right in " {0,3}",
        ) {
            let rules = ValidationRules::default();
            let padded = format!("{left}{core}{right}");
            for field in FieldKind::ALL {
                prop_assert_eq!(rules.check(field, &core), rules.check(field, &padded));
            }
        }

        #[test]
        fn accepted_email_has_single_at(value in "\\PC{0,24}") {
            let rules = ValidationRules::default();
            if rules.check(FieldKind::Email, &value).is_ok() {
                prop_assert_eq!(value.trim().matches('@').count(), 1);
                prop_assert!(!value.trim().contains(char::is_whitespace));
            }
        }
    }
}
