use std::sync::Arc;

use async_trait::async_trait;

use super::guard::{Guard, RequestContext};
use crate::error::ApiError;
use crate::services::DocumentExists;

/// Existence guard: the document named by a path parameter must exist.
/// Does not hand the document to the handler; the handler fetches its own.
pub struct DocumentExistsGuard {
    service: Arc<dyn DocumentExists>,
    entity: &'static str,
    param: &'static str,
}

impl DocumentExistsGuard {
    pub fn new(service: Arc<dyn DocumentExists>, entity: &'static str, param: &'static str) -> Self {
        Self { service, entity, param }
    }
}

#[async_trait]
impl Guard for DocumentExistsGuard {
    fn name(&self) -> &'static str {
        "DocumentExists"
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        let document_id = ctx.param(self.param)?;
        if !self.service.exists(document_id).await? {
            return Err(ApiError::not_found(format!(
                "{} with {} not found.",
                self.entity, document_id
            )));
        }
        Ok(())
    }

    fn establishes(&self) -> Option<&str> {
        Some(self.param)
    }
}
