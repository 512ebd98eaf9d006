//! Field rules used by validators.
//!
//! ```ignore
//! let mut f = Failures::new();
//! f.string("name", &cmd.name).required().max_length(100);
//! f.optional_string("contact_email", cmd.contact_email.as_deref())
//!     .map(|r| r.email());
//! f.nested("address", cmd.address.as_ref(), |f, a| {
//!     f.string("city", &a.city).required().max_length(100);
//! });
//! f.into_vec()
//! ```
//!
//! Every rule of a chain is evaluated; a field can fail several rules at once.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use bistro_core::{FieldFailure, Rule};

/// Accepted phone numbers: optional `+`, then 2 to 15 digits not starting with 0.
pub const PHONE_NUMBER_PATTERN: &str = r"^\+?[1-9]\d{1,14}$";

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_NUMBER_PATTERN).expect("phone number pattern is valid"));

/// Email check compatible with the usual web-framework rule: exactly one
/// `@`, neither first nor last.
pub fn is_valid_email(value: &str) -> bool {
    match value.find('@') {
        Some(at) => at > 0 && at + 1 < value.len() && value.rfind('@') == Some(at),
        None => false,
    }
}

pub fn is_valid_phone_number(value: &str) -> bool {
    PHONE_NUMBER.is_match(value)
}

/// Ordered collector of field failures, with an optional path prefix for
/// nested objects.
#[derive(Debug, Default)]
pub struct Failures {
    prefix: String,
    items: Vec<FieldFailure>,
}

impl Failures {
    pub fn new() -> Self {
        Self::default()
    }

    fn path(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }

    /// Start a rule chain on a required string field.
    pub fn string<'s>(&'s mut self, field: &str, value: &'s str) -> StringRule<'s> {
        let field = self.path(field);
        StringRule {
            sink: &mut self.items,
            field,
            value,
            last_failed: false,
        }
    }

    /// Start a rule chain on an optional string, only when it holds a
    /// non-empty value.
    pub fn optional_string<'s>(&'s mut self, field: &str, value: Option<&'s str>) -> Option<StringRule<'s>> {
        match value {
            Some(v) if !v.is_empty() => Some(self.string(field, v)),
            _ => None,
        }
    }

    pub fn number(&mut self, field: &str, value: u64) -> NumberRule<'_> {
        let field = self.path(field);
        NumberRule {
            sink: &mut self.items,
            field,
            value,
        }
    }

    /// Validate a nested object only when it is present.
    pub fn nested<T>(&mut self, field: &str, value: Option<&T>, rules: impl FnOnce(&mut Failures, &T)) {
        if let Some(inner) = value {
            let mut child = Failures {
                prefix: format!("{}.", self.path(field)),
                items: Vec::new(),
            };
            rules(&mut child, inner);
            self.items.extend(child.items);
        }
    }

    /// Validate each element of a collection under `field[i]`.
    pub fn each<T>(&mut self, field: &str, values: &[T], mut rules: impl FnMut(&mut Failures, &T)) {
        for (idx, value) in values.iter().enumerate() {
            let mut child = Failures {
                prefix: format!("{}[{idx}].", self.path(field)),
                items: Vec::new(),
            };
            rules(&mut child, value);
            self.items.extend(child.items);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldFailure> {
        self.items
    }
}

/// Rule chain on a string field.
pub struct StringRule<'s> {
    sink: &'s mut Vec<FieldFailure>,
    field: String,
    value: &'s str,
    last_failed: bool,
}

impl StringRule<'_> {
    fn check(mut self, ok: bool, rule: Rule, message: impl FnOnce(&str) -> String) -> Self {
        self.last_failed = !ok;
        if !ok {
            let message = message(&self.field);
            self.sink.push(FieldFailure::new(self.field.clone(), rule, message));
        }
        self
    }

    /// Non-empty and not only whitespace.
    pub fn required(self) -> Self {
        let ok = !self.value.trim().is_empty();
        self.check(ok, Rule::Required, |f| format!("'{f}' must not be empty."))
    }

    /// At most `max` characters; exactly `max` is accepted.
    pub fn max_length(self, max: usize) -> Self {
        let len = self.value.chars().count();
        self.check(len <= max, Rule::MaximumLength { max }, |f| {
            format!("The length of '{f}' must be {max} characters or fewer. You entered {len} characters.")
        })
    }

    pub fn email(self) -> Self {
        let ok = is_valid_email(self.value);
        self.check(ok, Rule::Email, |f| format!("'{f}' is not a valid email address."))
    }

    pub fn phone_number(self) -> Self {
        let ok = is_valid_phone_number(self.value);
        self.check(ok, Rule::PhoneNumber, |f| format!("'{f}' is not in the correct format."))
    }

    /// Replace the message of the preceding rule if it failed.
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Self {
        if self.last_failed
            && let Some(last) = self.sink.last_mut()
        {
            last.message = message.into().into_owned();
        }
        self
    }
}

/// Rule chain on a numeric field.
pub struct NumberRule<'s> {
    sink: &'s mut Vec<FieldFailure>,
    field: String,
    value: u64,
}

impl NumberRule<'_> {
    pub fn at_most(self, max: u64) -> Self {
        if self.value > max {
            let message = format!("'{}' must be less than or equal to {max}.", self.field);
            self.sink
                .push(FieldFailure::new(self.field.clone(), Rule::Maximum { max }, message));
        }
        self
    }
}
