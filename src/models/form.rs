use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One named input of the booking form.
///
/// Variants are declared in form order, which is also the iteration order of
/// [`FieldErrors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    CardNumber,
    ExpirationDate,
    Cvv,
    StreetAddress,
    City,
    State,
    ZipCode,
    Country,
}

impl FieldName {
    pub const ALL: [FieldName; 12] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Email,
        FieldName::PhoneNumber,
        FieldName::CardNumber,
        FieldName::ExpirationDate,
        FieldName::Cvv,
        FieldName::StreetAddress,
        FieldName::City,
        FieldName::State,
        FieldName::ZipCode,
        FieldName::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Email => "email",
            FieldName::PhoneNumber => "phoneNumber",
            FieldName::CardNumber => "cardNumber",
            FieldName::ExpirationDate => "expirationDate",
            FieldName::Cvv => "cvv",
            FieldName::StreetAddress => "streetAddress",
            FieldName::City => "city",
            FieldName::State => "state",
            FieldName::ZipCode => "zipCode",
            FieldName::Country => "country",
        }
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::FirstName => "First Name",
            FieldName::LastName => "Last Name",
            FieldName::Email => "Email Address",
            FieldName::PhoneNumber => "Phone Number",
            FieldName::CardNumber => "Card Number",
            FieldName::ExpirationDate => "Expiration Date (MM/YY)",
            FieldName::Cvv => "CVV",
            FieldName::StreetAddress => "Street Address",
            FieldName::City => "City",
            FieldName::State => "State/Province",
            FieldName::ZipCode => "ZIP/Postal Code",
            FieldName::Country => "Country",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FieldName::FirstName => "John",
            FieldName::LastName => "Doe",
            FieldName::Email => "john@example.com",
            FieldName::PhoneNumber => "+1 (123) 456-7890",
            FieldName::CardNumber => "1234 5678 9012 3456",
            FieldName::ExpirationDate => "MM/YY",
            FieldName::Cvv => "123",
            FieldName::StreetAddress => "123 Main St",
            FieldName::City => "New York",
            FieldName::State => "NY",
            FieldName::ZipCode => "10001",
            FieldName::Country => "United States",
        }
    }

    pub fn input_type(&self) -> InputType {
        match self {
            FieldName::Email => InputType::Email,
            FieldName::Cvv => InputType::Password,
            _ => InputType::Text,
        }
    }

    pub fn section(&self) -> FormSection {
        match self {
            FieldName::FirstName
            | FieldName::LastName
            | FieldName::Email
            | FieldName::PhoneNumber => FormSection::Contact,
            FieldName::CardNumber | FieldName::ExpirationDate | FieldName::Cvv => {
                FormSection::Payment
            }
            FieldName::StreetAddress
            | FieldName::City
            | FieldName::State
            | FieldName::ZipCode
            | FieldName::Country => FormSection::BillingAddress,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormSection {
    #[serde(rename = "Contact Information")]
    Contact,
    #[serde(rename = "Payment Information")]
    Payment,
    #[serde(rename = "Billing Address")]
    BillingAddress,
}

// Describes a single input for clients rendering the form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input_type: InputType,
    pub section: FormSection,
}

impl From<FieldName> for FieldDescriptor {
    fn from(name: FieldName) -> Self {
        Self {
            name,
            label: name.label(),
            placeholder: name.placeholder(),
            input_type: name.input_type(),
            section: name.section(),
        }
    }
}

/// Current value of every form field. All twelve fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub card_number: String,
    pub expiration_date: String,
    pub cvv: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl FieldValues {
    pub fn get(&self, name: FieldName) -> &str {
        match name {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::Email => &self.email,
            FieldName::PhoneNumber => &self.phone_number,
            FieldName::CardNumber => &self.card_number,
            FieldName::ExpirationDate => &self.expiration_date,
            FieldName::Cvv => &self.cvv,
            FieldName::StreetAddress => &self.street_address,
            FieldName::City => &self.city,
            FieldName::State => &self.state,
            FieldName::ZipCode => &self.zip_code,
            FieldName::Country => &self.country,
        }
    }

    fn slot_mut(&mut self, name: FieldName) -> &mut String {
        match name {
            FieldName::FirstName => &mut self.first_name,
            FieldName::LastName => &mut self.last_name,
            FieldName::Email => &mut self.email,
            FieldName::PhoneNumber => &mut self.phone_number,
            FieldName::CardNumber => &mut self.card_number,
            FieldName::ExpirationDate => &mut self.expiration_date,
            FieldName::Cvv => &mut self.cvv,
            FieldName::StreetAddress => &mut self.street_address,
            FieldName::City => &mut self.city,
            FieldName::State => &mut self.state,
            FieldName::ZipCode => &mut self.zip_code,
            FieldName::Country => &mut self.country,
        }
    }

    /// Stores `value` as-is. Callers outside the session go through
    /// `FormSession::update_field`, which formats first.
    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        *self.slot_mut(name) = value.into();
    }
}

/// Validation result: field → message. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: FieldName, message: impl Into<String>) {
        self.0.insert(name, message.into());
    }

    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.0.get(&name).map(String::as_str)
    }

    pub fn contains(&self, name: FieldName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(name, message)| (*name, message.as_str()))
    }
}
