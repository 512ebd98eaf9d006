//! Request validators.
//!
//! A validator inspects a request and returns the ordered list of field
//! failures it found; an empty list means the request is valid. Validators
//! are pure and order-independent, so the validation behavior simply
//! concatenates the failures of every validator registered for a type.

use std::marker::PhantomData;

use bistro_core::FieldFailure;

use crate::request::{Request, RequestEnvelope};

pub mod rules;

pub use rules::{Failures, NumberRule, StringRule, is_valid_email, is_valid_phone_number};

/// Field-rule checks for one request type.
pub trait Validator<R: Request>: Send + Sync + 'static {
    fn validate(&self, request: &R) -> Vec<FieldFailure>;
}

impl<R, F> Validator<R> for F
where
    R: Request,
    F: Fn(&R) -> Vec<FieldFailure> + Send + Sync + 'static,
{
    fn validate(&self, request: &R) -> Vec<FieldFailure> {
        self(request)
    }
}

/// Object-safe validator stored in the validation behavior.
pub(crate) trait ErasedValidator: Send + Sync {
    fn validate(&self, request: &RequestEnvelope<'_>) -> Vec<FieldFailure>;
}

pub(crate) struct TypedValidator<R, V> {
    validator: V,
    _request: PhantomData<fn(R)>,
}

impl<R, V> TypedValidator<R, V> {
    pub(crate) fn new(validator: V) -> Self {
        Self {
            validator,
            _request: PhantomData,
        }
    }
}

impl<R, V> ErasedValidator for TypedValidator<R, V>
where
    R: Request,
    V: Validator<R>,
{
    fn validate(&self, request: &RequestEnvelope<'_>) -> Vec<FieldFailure> {
        // Validators are keyed by TypeId, so a mismatch cannot happen through
        // the dispatcher; treat it as "nothing to report".
        request
            .downcast_ref::<R>()
            .map(|typed| self.validator.validate(typed))
            .unwrap_or_default()
    }
}
