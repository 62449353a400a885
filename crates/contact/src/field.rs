use std::{borrow::Cow, collections::BTreeMap, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};
use validator::{Validate, ValidationError};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+971|971)?[0-9]{9}$").expect("valid phone regex"));

pub const NAME_MIN_LEN: usize = 3;
pub const SUBJECT_MIN_LEN: usize = 3;
pub const MESSAGE_MIN_LEN: usize = 10;

#[derive(
    EnumString,
    Display,
    AsRefStr,
    IntoStaticStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid UAE phone number")]
    InvalidPhone,
}

impl FieldError {
    /// Translation key of the message shown next to the field.
    pub fn key(&self) -> &'static str {
        match self {
            FieldError::Required => "field_required",
            FieldError::TooShort { .. } => "field_too_short",
            FieldError::InvalidEmail => "field_invalid_email",
            FieldError::InvalidPhone => "field_invalid_phone",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::TooShort { .. } => "too_short",
            FieldError::InvalidEmail => "invalid_email",
            FieldError::InvalidPhone => "invalid_phone",
        }
    }

    fn from_validation(error: &ValidationError) -> Option<Self> {
        match error.code.as_ref() {
            "required" => Some(FieldError::Required),
            "too_short" => {
                let min = error.params.get("min")?.as_u64()?;
                Some(FieldError::TooShort { min: min as usize })
            }
            "invalid_email" => Some(FieldError::InvalidEmail),
            "invalid_phone" => Some(FieldError::InvalidPhone),
            _ => None,
        }
    }
}

impl From<FieldError> for ValidationError {
    fn from(value: FieldError) -> Self {
        let mut error =
            ValidationError::new(value.code()).with_message(Cow::Owned(value.to_string()));

        if let FieldError::TooShort { min } = value {
            error.add_param(Cow::Borrowed("min"), &min);
        }

        error
    }
}

/// Current message per field. A field without an entry is valid or has
/// not been looked at yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    /// Records the outcome of validating `field`, dropping any stale message.
    pub fn apply(&mut self, field: Field, outcome: Result<(), FieldError>) {
        match outcome {
            Ok(()) => self.0.remove(&field),
            Err(error) => self.0.insert(field, error),
        };
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(value: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::default();

        for (name, field_errors) in value.field_errors() {
            let Ok(field) = Field::from_str(&name) else {
                continue;
            };

            if let Some(error) = field_errors.iter().find_map(FieldError::from_validation) {
                errors.0.insert(field, error);
            }
        }

        errors
    }
}

#[derive(Validate, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormFields {
    #[validate(custom(function = "validate_name"))]
    #[serde(default)]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    #[serde(default)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    #[serde(default)]
    pub phone: String,
    #[validate(custom(function = "validate_subject"))]
    #[serde(default)]
    pub subject: String,
    #[validate(custom(function = "validate_message"))]
    #[serde(default)]
    pub message: String,
}

impl ContactFormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Subject => self.subject = value,
            Field::Message => self.message = value,
        }
    }

    pub fn clear(&mut self) {
        *self = ContactFormFields::default();
    }

    pub fn is_empty(&self) -> bool {
        Field::VARIANTS
            .iter()
            .all(|field| self.get(*field).is_empty())
    }

    /// Runs every rule; the result is the authoritative gate for submission.
    pub fn check(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => errors.into(),
        }
    }
}

/// Validates a single value against the rule of `field`.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }

    match field {
        Field::Name => min_chars(trimmed, NAME_MIN_LEN),
        Field::Subject => min_chars(trimmed, SUBJECT_MIN_LEN),
        Field::Message => min_chars(trimmed, MESSAGE_MIN_LEN),
        Field::Email if EMAIL_REGEX.is_match(trimmed) => Ok(()),
        Field::Email => Err(FieldError::InvalidEmail),
        Field::Phone if PHONE_REGEX.is_match(&normalize_phone(trimmed)) => Ok(()),
        Field::Phone => Err(FieldError::InvalidPhone),
    }
}

/// Drops the whitespace and hyphens visitors use to group digits.
pub fn normalize_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn min_chars(value: &str, min: usize) -> Result<(), FieldError> {
    if value.chars().count() < min {
        return Err(FieldError::TooShort { min });
    }

    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_field(Field::Name, value).map_err(Into::into)
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    validate_field(Field::Email, value).map_err(Into::into)
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    validate_field(Field::Phone, value).map_err(Into::into)
}

fn validate_subject(value: &str) -> Result<(), ValidationError> {
    validate_field(Field::Subject, value).map_err(Into::into)
}

fn validate_message(value: &str) -> Result<(), ValidationError> {
    validate_field(Field::Message, value).map_err(Into::into)
}
