//! Request handler abstraction.

use std::any::Any;
use std::marker::PhantomData;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::Outcome;

use crate::dispatcher::DispatchError;
use crate::request::{Request, RequestEnvelope};

/// Expected business failures live in the `Outcome`; the `Err` side is for
/// faults (store outages, cancellation) that the transport turns into a
/// generic server error.
pub type HandlerResult<T> = Result<Outcome<T>, DispatchError>;

/// The single unit of business logic bound to one request type.
///
/// Handlers receive input that already passed validation, and must pass
/// `cancel` to every store call so an aborted request never half-commits.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: &R, cancel: &CancellationToken) -> HandlerResult<R::Response>;
}

/// Type-erased success value travelling back through the behavior chain.
pub type AnyResponse = Box<dyn Any + Send>;

/// Object-safe handler stored in the dispatcher registry.
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn handle(
        &self,
        request: &RequestEnvelope<'_>,
        cancel: &CancellationToken,
    ) -> HandlerResult<AnyResponse>;
}

pub(crate) struct TypedHandler<R, H> {
    handler: H,
    _request: PhantomData<fn(R)>,
}

impl<R, H> TypedHandler<R, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _request: PhantomData,
        }
    }
}

#[async_trait]
impl<R, H> ErasedHandler for TypedHandler<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    async fn handle(
        &self,
        request: &RequestEnvelope<'_>,
        cancel: &CancellationToken,
    ) -> HandlerResult<AnyResponse> {
        let typed = request
            .downcast_ref::<R>()
            .ok_or(DispatchError::RequestTypeMismatch(R::NAME))?;
        let outcome = self.handler.handle(typed, cancel).await?;
        Ok(outcome.map(|value| Box::new(value) as AnyResponse))
    }
}
