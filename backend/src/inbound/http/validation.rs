//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field errors share one shape: `400 invalid_request` with
//! `details: {"field": ..., "code": ...}`.

use crate::domain::{Error, ItemNameValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    Required,
    Blank,
    Invalid,
    MinLength,
    MaxLength,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            FieldErrorCode::Required => "required",
            FieldErrorCode::Blank => "blank",
            FieldErrorCode::Invalid => "invalid",
            FieldErrorCode::MinLength => "min_length",
            FieldErrorCode::MaxLength => "max_length",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");

fn field_error(field: FieldName, code: FieldErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_field(field.as_str(), code.as_str(), message)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        FieldErrorCode::Required,
        format!("{} is required", field.as_str()),
    )
}

/// Require an optional body field, reporting `required` when absent.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    let (field, code) = match err {
        UserValidationError::InvalidId => (FieldName::new("id"), FieldErrorCode::Invalid),
        UserValidationError::MissingEmail => (EMAIL, FieldErrorCode::Blank),
        UserValidationError::InvalidEmail => (EMAIL, FieldErrorCode::Invalid),
        UserValidationError::EmailTooLong { .. } => (EMAIL, FieldErrorCode::MaxLength),
        UserValidationError::NameTooLong { .. } => (NAME, FieldErrorCode::MaxLength),
        UserValidationError::EmptyPassword => (PASSWORD, FieldErrorCode::Blank),
        UserValidationError::PasswordTooShort { .. } => (PASSWORD, FieldErrorCode::MinLength),
    };
    field_error(field, code, message)
}

pub(crate) fn map_item_name_error(err: ItemNameValidationError) -> Error {
    let message = err.to_string();
    let code = match err {
        ItemNameValidationError::Empty => FieldErrorCode::Blank,
        ItemNameValidationError::TooLong { .. } => FieldErrorCode::MaxLength,
    };
    field_error(NAME, code, message)
}
