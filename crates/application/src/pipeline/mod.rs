//! Cross-cutting behaviors composed around handler invocation.
//!
//! The dispatcher holds an ordered list of behaviors. For each request the
//! list is folded into a chain of [`Next`] continuations: the first
//! behavior runs outermost and the handler sits at the core.
//!
//! ```text
//! send(request)
//!   -> RequestLoggingBehavior
//!     -> (custom behaviors)
//!       -> ValidationBehavior   (may short-circuit with a Validation failure)
//!         -> handler
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::handler::{AnyResponse, ErasedHandler, HandlerResult};
use crate::request::RequestEnvelope;

pub mod logging;
pub mod validation;

pub use logging::RequestLoggingBehavior;
pub use validation::ValidationBehavior;

/// Outcome of a type-erased pipeline step.
pub type PipelineResult = HandlerResult<AnyResponse>;

/// A wrapper executed around handler invocation.
///
/// A behavior either calls `next.run(..)` exactly once and returns what it
/// yields, or returns early without calling it (short-circuit).
#[async_trait]
pub trait PipelineBehavior: Send + Sync {
    async fn handle(
        &self,
        request: &RequestEnvelope<'_>,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> PipelineResult;
}

/// Continuation to the rest of the chain.
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn PipelineBehavior>],
    handler: &'a dyn ErasedHandler,
}

impl<'a> Next<'a> {
    pub(crate) fn new(behaviors: &'a [Arc<dyn PipelineBehavior>], handler: &'a dyn ErasedHandler) -> Self {
        Self { behaviors, handler }
    }

    /// Invoke the next behavior, or the handler once the list is exhausted.
    pub async fn run(self, request: &RequestEnvelope<'_>, cancel: &CancellationToken) -> PipelineResult {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(request, cancel, Next::new(rest, self.handler))
                    .await
            }
            None => self.handler.handle(request, cancel).await,
        }
    }
}
