//! Request contracts (commands and queries).

use std::any::{Any, TypeId};

/// A command or query routed through the [`crate::Dispatcher`].
///
/// Each concrete request type has exactly one handler and zero or more
/// validators. Requests are created per call and dropped after handling.
pub trait Request: Send + Sync + 'static {
    /// Value carried by a successful outcome.
    type Response: Send + 'static;

    /// Stable name used in logs and configuration errors.
    const NAME: &'static str;
}

/// Type-erased view of a request as it travels through pipeline behaviors.
#[derive(Clone, Copy)]
pub struct RequestEnvelope<'a> {
    name: &'static str,
    type_id: TypeId,
    payload: &'a (dyn Any + Send + Sync),
}

impl<'a> RequestEnvelope<'a> {
    pub fn new<R: Request>(request: &'a R) -> Self {
        Self {
            name: R::NAME,
            type_id: TypeId::of::<R>(),
            payload: request,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn downcast_ref<R: Request>(&self) -> Option<&'a R> {
        self.payload.downcast_ref::<R>()
    }
}

impl core::fmt::Debug for RequestEnvelope<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestEnvelope").field("name", &self.name).finish()
    }
}
