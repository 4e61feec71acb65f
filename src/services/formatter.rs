//! Keystroke formatting for booking form fields.
//!
//! Every function here is total and idempotent: formatting an already
//! formatted value returns it unchanged, and malformed input degrades to the
//! best canonical prefix instead of failing.

use crate::models::form::FieldName;

const CARD_GROUP_SIZE: usize = 4;
const CARD_MAX_LEN: usize = 19;
const EXPIRY_MAX_LEN: usize = 5;
const CVV_MAX_LEN: usize = 4;

/// Convert a raw value for `name` into the form it is stored as.
pub fn format_field(name: FieldName, raw: &str) -> String {
    match name {
        FieldName::CardNumber => format_card_number(raw),
        FieldName::ExpirationDate => format_expiration_date(raw),
        FieldName::Cvv => format_cvv(raw),
        FieldName::PhoneNumber => format_phone_number(raw),
        _ => raw.to_string(),
    }
}

/// Regroup into blocks of four separated by a single space, capped at 19
/// characters. Letters are kept; rejecting them is the validator's job.
pub fn format_card_number(raw: &str) -> String {
    let compact: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();

    compact
        .chunks(CARD_GROUP_SIZE)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(CARD_MAX_LEN)
        .collect()
}

/// Digits only, `/` after the month, `MM/YY` at most.
pub fn format_expiration_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let formatted = if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    };

    formatted.chars().take(EXPIRY_MAX_LEN).collect()
}

pub fn format_cvv(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(CVV_MAX_LEN)
        .collect()
}

// No truncation; length is checked by the validator
pub fn format_phone_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')') || c.is_whitespace())
        .collect()
}
