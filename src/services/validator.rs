use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::form::{FieldErrors, FieldName, FieldValues};

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s()\-]{10,}$").expect("valid phone pattern"));

static CARD_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s\-]{13,19}$").expect("valid card number pattern"));

static EXPIRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid expiry pattern"));

static CVV_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").expect("valid cvv pattern"));

// How a field is checked before any format rule applies
enum Presence {
    // Empty after trimming counts as missing
    Trimmed,
    // Only the empty string counts as missing
    Raw,
}

struct FieldRule {
    name: FieldName,
    presence: Presence,
    required_message: &'static str,
    format: Option<(&'static Lazy<Regex>, &'static str)>,
}

static RULES: [FieldRule; 12] = [
    FieldRule {
        name: FieldName::FirstName,
        presence: Presence::Trimmed,
        required_message: "First name is required",
        format: None,
    },
    FieldRule {
        name: FieldName::LastName,
        presence: Presence::Trimmed,
        required_message: "Last name is required",
        format: None,
    },
    FieldRule {
        name: FieldName::Email,
        presence: Presence::Raw,
        required_message: "Email is required",
        format: Some((&EMAIL_REGEX, "Please enter a valid email")),
    },
    FieldRule {
        name: FieldName::PhoneNumber,
        presence: Presence::Raw,
        required_message: "Phone number is required",
        format: Some((&PHONE_REGEX, "Please enter a valid phone number")),
    },
    FieldRule {
        name: FieldName::CardNumber,
        presence: Presence::Raw,
        required_message: "Card number is required",
        format: Some((&CARD_NUMBER_REGEX, "Please enter a valid card number")),
    },
    FieldRule {
        name: FieldName::ExpirationDate,
        presence: Presence::Raw,
        required_message: "Expiration date is required",
        format: Some((&EXPIRY_REGEX, "Please use MM/YY format")),
    },
    FieldRule {
        name: FieldName::Cvv,
        presence: Presence::Raw,
        required_message: "CVV is required",
        format: Some((&CVV_REGEX, "Please enter a valid CVV")),
    },
    FieldRule {
        name: FieldName::StreetAddress,
        presence: Presence::Trimmed,
        required_message: "Street address is required",
        format: None,
    },
    FieldRule {
        name: FieldName::City,
        presence: Presence::Trimmed,
        required_message: "City is required",
        format: None,
    },
    FieldRule {
        name: FieldName::State,
        presence: Presence::Trimmed,
        required_message: "State is required",
        format: None,
    },
    FieldRule {
        name: FieldName::ZipCode,
        presence: Presence::Trimmed,
        required_message: "Zip code is required",
        format: None,
    },
    FieldRule {
        name: FieldName::Country,
        presence: Presence::Trimmed,
        required_message: "Country is required",
        format: None,
    },
];

impl FieldRule {
    fn check(&self, value: &str) -> Option<&'static str> {
        let missing = match self.presence {
            Presence::Trimmed => value.trim().is_empty(),
            Presence::Raw => value.is_empty(),
        };

        if missing {
            return Some(self.required_message);
        }

        match self.format {
            Some((pattern, message)) if !pattern.is_match(value) => Some(message),
            _ => None,
        }
    }
}

/// Validate a complete set of field values.
///
/// Each field is checked independently; a missing value reports the
/// "required" message and skips the format rule. The form is valid iff the
/// returned map is empty.
pub fn validate_form(values: &FieldValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for rule in &RULES {
        if let Some(message) = rule.check(values.get(rule.name)) {
            errors.insert(rule.name, message);
        }
    }

    errors
}
