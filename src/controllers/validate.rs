//! Contact form field rules
//!
//! Pure functions: no DOM, no state. Input is trimmed before any check and
//! lengths are counted in characters.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `local@domain.tld`: no whitespace, one `@`, a `.` somewhere after it.
/// Deliberately permissive; no TLD or domain checks.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

const NAME_MIN_CHARS: usize = 2;
const MESSAGE_MIN_CHARS: usize = 10;

/// Contact form fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// `name` input
    Name,
    /// `email` input
    Email,
    /// `message` textarea
    Message,
}

impl Field {
    /// Every field, in form order
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// The input's `name` attribute
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Position in [`Field::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Email => 1,
            Self::Message => 2,
        }
    }

    /// Field for an input `name` attribute
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a field was rejected; `Display` is the message shown to the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Name left empty
    #[error("Name is required")]
    NameRequired,
    /// Name below the minimum length
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    /// Email left empty
    #[error("Email is required")]
    EmailRequired,
    /// Email does not look like `local@domain.tld`
    #[error("Please enter a valid email address")]
    EmailInvalid,
    /// Message left empty
    #[error("Message is required")]
    MessageRequired,
    /// Message below the minimum length
    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}

/// Whether `email` (already trimmed) matches the permissive address pattern
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Check one field value
///
/// # Errors
///
/// Returns the rule the trimmed value breaks.
pub fn validate(field: Field, raw: &str) -> Result<(), ValidationError> {
    let value = raw.trim();
    let chars = value.chars().count();
    match field {
        Field::Name if value.is_empty() => Err(ValidationError::NameRequired),
        Field::Name if chars < NAME_MIN_CHARS => Err(ValidationError::NameTooShort),
        Field::Email if value.is_empty() => Err(ValidationError::EmailRequired),
        Field::Email if !is_valid_email(value) => Err(ValidationError::EmailInvalid),
        Field::Message if value.is_empty() => Err(ValidationError::MessageRequired),
        Field::Message if chars < MESSAGE_MIN_CHARS => Err(ValidationError::MessageTooShort),
        _ => Ok(()),
    }
}

/// Check all three fields, returning every failure in form order
#[must_use]
pub fn validate_all(name: &str, email: &str, message: &str) -> Vec<(Field, ValidationError)> {
    [(Field::Name, name), (Field::Email, email), (Field::Message, message)]
        .into_iter()
        .filter_map(|(field, value)| validate(field, value).err().map(|e| (field, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Field::Name, "", Some(ValidationError::NameRequired))]
    #[case(Field::Name, "   ", Some(ValidationError::NameRequired))]
    #[case(Field::Name, "A", Some(ValidationError::NameTooShort))]
    #[case(Field::Name, " A ", Some(ValidationError::NameTooShort))]
    #[case(Field::Name, "Al", None)]
    #[case(Field::Email, "", Some(ValidationError::EmailRequired))]
    #[case(Field::Email, "a@b", Some(ValidationError::EmailInvalid))]
    #[case(Field::Email, "a b@c.com", Some(ValidationError::EmailInvalid))]
    #[case(Field::Email, "a@@b.co", Some(ValidationError::EmailInvalid))]
    #[case(Field::Email, "a@b.co", None)]
    #[case(Field::Email, "  al@example.com ", None)]
    #[case(Field::Message, "", Some(ValidationError::MessageRequired))]
    #[case(Field::Message, "too short", Some(ValidationError::MessageTooShort))]
    #[case(Field::Message, "exactly 10", None)]
    #[case(Field::Message, "Hello there friend", None)]
    fn test_validate_rules(
        #[case] field: Field,
        #[case] value: &str,
        #[case] expected: Option<ValidationError>,
    ) {
        assert_eq!(validate(field, value).err(), expected);
    }

    #[rstest]
    #[case(ValidationError::NameRequired, "Name is required")]
    #[case(ValidationError::NameTooShort, "Name must be at least 2 characters")]
    #[case(ValidationError::EmailRequired, "Email is required")]
    #[case(ValidationError::EmailInvalid, "Please enter a valid email address")]
    #[case(ValidationError::MessageRequired, "Message is required")]
    #[case(ValidationError::MessageTooShort, "Message must be at least 10 characters")]
    fn test_error_messages(#[case] error: ValidationError, #[case] message: &str) {
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn test_email_pattern_is_permissive() {
        assert!(is_valid_email("x@y.z"));
        assert!(is_valid_email("first.last+tag@sub.domain.example"));
        assert!(is_valid_email("a@b.c.d"));
        assert!(!is_valid_email("a@.b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(validate(Field::Name, "Zé"), Ok(()));
        assert_eq!(validate(Field::Message, "ééééééééé"), Err(ValidationError::MessageTooShort));
    }

    #[test]
    fn test_validate_all_collects_in_form_order() {
        let failures = validate_all("", "nope", "short");
        assert_eq!(
            failures,
            vec![
                (Field::Name, ValidationError::NameRequired),
                (Field::Email, ValidationError::EmailInvalid),
                (Field::Message, ValidationError::MessageTooShort),
            ]
        );
        assert!(validate_all("Al", "al@example.com", "Hello there friend").is_empty());
    }

    #[test]
    fn test_field_names() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
            assert_eq!(Field::ALL[field.index()], field);
        }
        assert_eq!(Field::from_name("phone"), None);
    }

    proptest! {
        #[test]
        fn prop_whitespace_in_email_rejected(
            local in "[a-z]{1,8}",
            tail in "[a-z]{0,4}",
            domain in "[a-z]{1,8}",
        ) {
            let email = format!("{local} {tail}@{domain}.com");
            prop_assert!(!is_valid_email(&email));
        }

        #[test]
        fn prop_simple_addresses_accepted(
            local in "[a-z0-9]{1,12}",
            domain in "[a-z]{1,12}",
            tld in "[a-z]{1,6}",
        ) {
            let email = format!("{local}@{domain}.{tld}");
            prop_assert!(validate(Field::Email, &email).is_ok());
        }

        #[test]
        fn prop_surrounding_whitespace_ignored(name in "[A-Za-z]{2,20}", pad in " {0,5}") {
            let padded = format!("{pad}{name}{pad}");
            prop_assert_eq!(validate(Field::Name, &padded), validate(Field::Name, &name));
        }
    }
}
