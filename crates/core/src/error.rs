//! Error model shared by validators, handlers and the HTTP adapter.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Category of an [`Error`].
///
/// The transport layer derives its status code from this value only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Generic or unexpected failure.
    Failure,
    /// Bad input shape or content.
    Validation,
    /// A referenced entity is absent.
    NotFound,
    /// State contention (reserved).
    Conflict,
    /// Authorization failure.
    Forbidden,
}

/// Validation rule that a field violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Rule {
    Required,
    MaximumLength { max: usize },
    Email,
    PhoneNumber,
    Maximum { max: u64 },
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
            Rule::MaximumLength { max } => write!(f, "maximum_length({max})"),
            Rule::Email => f.write_str("email"),
            Rule::PhoneNumber => f.write_str("phone_number"),
            Rule::Maximum { max } => write!(f, "maximum({max})"),
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// Dotted path of the offending field (e.g. `address.city`).
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// Business-level error carried by a failed [`crate::Outcome`].
///
/// `failures` is only populated for errors produced by request validation.
#[derive(Debug, Clone, PartialEq, Eq, ThisError, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Error {
    code: Cow<'static, str>,
    message: Cow<'static, str>,
    kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FieldFailure>,
}

impl Error {
    pub const NULL_VALUE: Error = Error::fixed(
        "Error.NullValue",
        "The specified result value is null.",
        ErrorKind::Failure,
    );

    pub const CONDITION_NOT_MET: Error = Error::fixed(
        "Error.ConditionNotMet",
        "The specified condition was not met.",
        ErrorKind::Validation,
    );

    pub const UNAUTHORIZED: Error = Error::fixed(
        "Error.Unauthorized",
        "The current user is not authorized to perform this operation.",
        ErrorKind::Forbidden,
    );

    pub const FORBIDDEN: Error = Error::fixed(
        "Error.Forbidden",
        "The current user is forbidden from performing this operation.",
        ErrorKind::Forbidden,
    );

    pub const NOT_FOUND: Error = Error::fixed(
        "Error.NotFound",
        "The requested resource was not found.",
        ErrorKind::NotFound,
    );

    pub const CONFLICT: Error = Error::fixed(
        "Error.Conflict",
        "The request conflicts with the current state of the resource.",
        ErrorKind::Conflict,
    );

    const fn fixed(code: &'static str, message: &'static str, kind: ErrorKind) -> Self {
        Self {
            code: Cow::Borrowed(code),
            message: Cow::Borrowed(message),
            kind,
            failures: Vec::new(),
        }
    }

    pub fn new(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            kind,
            failures: Vec::new(),
        }
    }

    pub fn failure(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message, ErrorKind::Failure)
    }

    pub fn validation(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message, ErrorKind::Validation)
    }

    pub fn not_found(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message, ErrorKind::NotFound)
    }

    pub fn conflict(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message, ErrorKind::Conflict)
    }

    pub fn forbidden(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message, ErrorKind::Forbidden)
    }

    /// Aggregate every collected field failure into one validation error.
    pub fn validation_failures(failures: Vec<FieldFailure>) -> Self {
        Self {
            code: Cow::Borrowed("Validation.General"),
            message: Cow::Borrowed("One or more validation errors occurred."),
            kind: ErrorKind::Validation,
            failures,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_carry_their_kind() {
        assert_eq!(Error::NOT_FOUND.kind(), ErrorKind::NotFound);
        assert_eq!(Error::CONFLICT.kind(), ErrorKind::Conflict);
        assert_eq!(Error::FORBIDDEN.kind(), ErrorKind::Forbidden);
        assert_eq!(Error::UNAUTHORIZED.kind(), ErrorKind::Forbidden);
        assert_eq!(Error::CONDITION_NOT_MET.kind(), ErrorKind::Validation);
        assert_eq!(Error::NULL_VALUE.kind(), ErrorKind::Failure);
        assert!(Error::NOT_FOUND.failures().is_empty());
    }

    #[test]
    fn validation_failures_keep_every_entry_in_order() {
        let err = Error::validation_failures(vec![
            FieldFailure::new("name", Rule::Required, "'name' must not be empty."),
            FieldFailure::new("address.city", Rule::MaximumLength { max: 100 }, "too long"),
        ]);

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), "Validation.General");
        let fields: Vec<_> = err.failures().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "address.city"]);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = Error::failure("Restaurant.Broken", "it broke");
        assert_eq!(err.to_string(), "Restaurant.Broken: it broke");
    }

    #[test]
    fn rule_serializes_with_name_tag() {
        let json = serde_json::to_value(Rule::MaximumLength { max: 20 }).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "maximum_length", "max": 20 }));
    }
}
