use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ContactPayload;

/// Lower-cased field name → human readable message
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    ))
    .unwrap()
});

static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]?[0-9]{7,14}$").unwrap());

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    /// Minimum length in characters
    Min(usize),
    Email,
    E164,
    /// Any other check; violations get the generic message
    Custom {
        tag: &'static str,
        check: fn(&str) -> bool,
    },
}

impl Rule {
    pub fn tag(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Min(_) => "min",
            Rule::Email => "email",
            Rule::E164 => "e164",
            Rule::Custom { tag, .. } => tag,
        }
    }

    fn passes(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::Min(min) => value.chars().count() >= *min,
            Rule::Email => EMAIL_REGEX.is_match(value),
            Rule::E164 => E164_REGEX.is_match(value),
            Rule::Custom { check, .. } => check(value),
        }
    }

    fn message(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("{field} is required"),
            Rule::Min(min) => format!("{field} must be at least {min} characters"),
            Rule::Email => format!("{field} must be a valid email address"),
            Rule::E164 => format!("{field} must be a valid E.164 phone number"),
            Rule::Custom { .. } => format!("Invalid value for {field}"),
        }
    }
}

/// Collects the first violated rule of every field.
///
/// Fields are all checked, so a request can report several errors at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: &str, rules: &[Rule]) -> Self {
        if let Some(rule) = rules.iter().find(|rule| !rule.passes(value)) {
            let field = name.to_lowercase();
            let message = rule.message(&field);
            self.errors.insert(field, message);
        }
        self
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

pub trait Validate {
    /// Empty map means the value is acceptable
    fn validate(&self) -> FieldErrors;
}

impl Validate for ContactPayload {
    fn validate(&self) -> FieldErrors {
        Validator::new()
            .field("Name", &self.name, &[Rule::Required, Rule::Min(3)])
            .field("Email", &self.email, &[Rule::Required, Rule::Email])
            .field("Phone", &self.phone, &[Rule::Required, Rule::E164])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload_has_no_errors() {
        let payload = ContactPayload::new("Ada Lovelace", "ada@example.com", "+442071234567");
        assert!(payload.validate().is_empty());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = ContactPayload::default().validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], "name is required");
        assert_eq!(errors["email"], "email is required");
        assert_eq!(errors["phone"], "phone is required");
    }

    #[test]
    fn test_each_rule_message() {
        let errors = ContactPayload::new("Al", "not-an-email", "0812345678").validate();
        assert_eq!(errors["name"], "name must be at least 3 characters");
        assert_eq!(errors["email"], "email must be a valid email address");
        assert_eq!(errors["phone"], "phone must be a valid E.164 phone number");
    }

    #[test]
    fn test_min_counts_characters_not_bytes() {
        let errors = ContactPayload::new("Zoë", "zoe@example.com", "+33612345678").validate();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_e164_shapes() {
        for ok in ["+14155552671", "+628123456789", "+4930123456"] {
            assert!(Rule::E164.passes(ok), "{ok} should pass");
        }
        for bad in ["14155552671", "+1 415 555 2671", "+1", "+1415555267123456", ""] {
            assert!(!Rule::E164.passes(bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_email_shapes() {
        for ok in ["a@b.co", "first.last+tag@sub.example.org"] {
            assert!(Rule::Email.passes(ok), "{ok} should pass");
        }
        for bad in ["plain", "@example.com", "a@", "a b@example.com", "a@example"] {
            assert!(!Rule::Email.passes(bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_custom_rule_uses_generic_message() {
        let no_digits = Rule::Custom {
            tag: "alpha",
            check: |value| !value.chars().any(|c| c.is_ascii_digit()),
        };
        let errors = Validator::new()
            .field("Nickname", "r2d2", &[Rule::Required, no_digits])
            .finish();
        assert_eq!(errors["nickname"], "Invalid value for nickname");
        assert_eq!(no_digits.tag(), "alpha");
    }

    #[test]
    fn test_first_failing_rule_wins_per_field() {
        let errors = Validator::new()
            .field("Name", "", &[Rule::Required, Rule::Min(3)])
            .finish();
        assert_eq!(errors["name"], "name is required");
    }
}
