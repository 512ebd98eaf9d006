//! Validation behavior.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_core::{Error, Outcome};

use super::{Next, PipelineBehavior, PipelineResult};
use crate::request::RequestEnvelope;
use crate::validation::ErasedValidator;

/// Runs every validator registered for the request type before the handler.
///
/// Any failure aborts the chain with a single `Validation` error carrying
/// all collected field failures; the handler is not invoked.
#[derive(Default)]
pub struct ValidationBehavior {
    validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
}

impl ValidationBehavior {
    pub(crate) fn new(validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>) -> Self {
        Self { validators }
    }

    pub fn validator_count(&self, request_type: TypeId) -> usize {
        self.validators.get(&request_type).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PipelineBehavior for ValidationBehavior {
    async fn handle(
        &self,
        request: &RequestEnvelope<'_>,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> PipelineResult {
        let validators = match self.validators.get(&request.type_id()) {
            Some(v) if !v.is_empty() => v,
            _ => return next.run(request, cancel).await,
        };

        let failures: Vec<_> = validators
            .iter()
            .flat_map(|validator| validator.validate(request))
            .collect();

        if !failures.is_empty() {
            tracing::warn!(
                request = request.name(),
                failures = failures.len(),
                "request rejected by validation"
            );
            return Ok(Outcome::Failure(Error::validation_failures(failures)));
        }

        next.run(request, cancel).await
    }
}
