//! Request logging behavior.

use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::Outcome;

use super::{Next, PipelineBehavior, PipelineResult};
use crate::request::RequestEnvelope;

/// Emits a start and an end marker naming the request type.
///
/// Never alters the result: outcomes and faults are passed through as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLoggingBehavior;

#[async_trait]
impl PipelineBehavior for RequestLoggingBehavior {
    async fn handle(
        &self,
        request: &RequestEnvelope<'_>,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> PipelineResult {
        let request_name = request.name();
        tracing::info!(request = request_name, "Handling {request_name}");
        let started = Instant::now();

        let result = next.run(request, cancel).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(Outcome::Success(_)) => {
                tracing::info!(request = request_name, success = true, elapsed_ms, "Handled {request_name}");
            }
            Ok(Outcome::Failure(error)) => {
                tracing::info!(
                    request = request_name,
                    success = false,
                    error_code = error.code(),
                    elapsed_ms,
                    "Handled {request_name}"
                );
            }
            Err(fault) => {
                tracing::error!(request = request_name, elapsed_ms, error = %fault, "Failed {request_name}");
            }
        }

        result
    }
}
