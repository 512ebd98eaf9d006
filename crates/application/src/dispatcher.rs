//! Request dispatcher (sender/handler registry).
//!
//! ```text
//! Dispatcher::send(request)
//!   ↓
//! 1. Resolve the single handler registered for the request type
//!   ↓
//! 2. Fold the behavior list into a `Next` chain around it
//!   ↓
//! 3. Run: logging -> custom behaviors -> validation -> handler
//!   ↓
//! 4. Downcast the erased response back to `R::Response`
//! ```
//!
//! The registry is assembled once through [`DispatcherBuilder`] and is
//! immutable afterwards; share the built dispatcher behind an `Arc`.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use bistro_core::Outcome;

use crate::data::StoreError;
use crate::handler::{ErasedHandler, RequestHandler, TypedHandler};
use crate::pipeline::{Next, PipelineBehavior, RequestLoggingBehavior, ValidationBehavior};
use crate::request::{Request, RequestEnvelope};
use crate::validation::{ErasedValidator, TypedValidator, Validator};

/// Fault raised while dispatching a request.
///
/// Business failures are never reported here; they travel inside the
/// returned [`Outcome`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Startup wiring bug: nothing handles this request type.
    #[error("no handler registered for request `{0}`")]
    HandlerNotRegistered(&'static str),
    #[error("handler for `{0}` received a different request type")]
    RequestTypeMismatch(&'static str),
    #[error("handler for `{0}` produced a different response type")]
    ResponseTypeMismatch(&'static str),
    #[error("store failure: {0}")]
    Store(StoreError),
    #[error("request cancelled")]
    Cancelled,
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Cancelled => DispatchError::Cancelled,
            other => DispatchError::Store(other),
        }
    }
}

struct Registration {
    name: &'static str,
    handler: Arc<dyn ErasedHandler>,
}

/// Routes each request to its handler through the behavior chain.
pub struct Dispatcher {
    handlers: HashMap<TypeId, Registration>,
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Send a request through the pipeline and return its outcome.
    ///
    /// A token that is already cancelled fails fast with
    /// [`DispatchError::Cancelled`] before any behavior runs.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<Outcome<R::Response>, DispatchError> {
        let registration = self
            .handlers
            .get(&TypeId::of::<R>())
            .ok_or(DispatchError::HandlerNotRegistered(R::NAME))?;

        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let envelope = RequestEnvelope::new(&request);
        let outcome = Next::new(&self.behaviors, registration.handler.as_ref())
            .run(&envelope, cancel)
            .await?;

        match outcome {
            Outcome::Success(response) => response
                .downcast::<R::Response>()
                .map(|value| Outcome::Success(*value))
                .map_err(|_| DispatchError::ResponseTypeMismatch(R::NAME)),
            Outcome::Failure(error) => Ok(Outcome::Failure(error)),
        }
    }

    pub fn is_registered<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Startup check that a request type can be dispatched.
    pub fn ensure_registered<R: Request>(&self) -> Result<(), DispatchError> {
        if self.is_registered::<R>() {
            Ok(())
        } else {
            Err(DispatchError::HandlerNotRegistered(R::NAME))
        }
    }

    /// Names of every registered request type, sorted.
    pub fn registered_requests(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|r| r.name).collect();
        names.sort_unstable();
        names
    }
}

impl core::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("requests", &self.registered_requests())
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}

/// Explicit, ordered wiring of handlers, validators and behaviors.
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<TypeId, Registration>,
    validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
}

impl DispatcherBuilder {
    /// Register the handler for `R`. A later registration for the same
    /// type replaces the earlier one.
    pub fn handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let registration = Registration {
            name: R::NAME,
            handler: Arc::new(TypedHandler::<R, H>::new(handler)),
        };
        if self.handlers.insert(TypeId::of::<R>(), registration).is_some() {
            tracing::warn!(request = R::NAME, "handler registered twice; last registration wins");
        }
        self
    }

    /// Add a validator for `R`. Validators run in registration order.
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R>,
    {
        self.validators
            .entry(TypeId::of::<R>())
            .or_default()
            .push(Arc::new(TypedValidator::<R, V>::new(validator)));
        self
    }

    /// Add a custom behavior. Custom behaviors run inside request logging
    /// and outside validation, in registration order.
    pub fn behavior<B>(mut self, behavior: B) -> Self
    where
        B: PipelineBehavior + 'static,
    {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    pub fn build(self) -> Dispatcher {
        let mut behaviors: Vec<Arc<dyn PipelineBehavior>> = Vec::with_capacity(self.behaviors.len() + 2);
        behaviors.push(Arc::new(RequestLoggingBehavior));
        behaviors.extend(self.behaviors);
        behaviors.push(Arc::new(ValidationBehavior::new(self.validators)));

        Dispatcher {
            handlers: self.handlers,
            behaviors,
        }
    }
}
