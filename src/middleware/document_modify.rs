use std::sync::Arc;

use async_trait::async_trait;

use super::guard::{Guard, RequestContext};
use crate::error::ApiError;
use crate::services::DocumentOwnership;

/// Ownership guard: the principal must be allowed to modify the document
/// named by a path parameter. Must follow a `DocumentExistsGuard` for the
/// same parameter, so a missing document is reported as not found.
pub struct DocumentModifyGuard {
    service: Arc<dyn DocumentOwnership>,
    entity: &'static str,
    param: &'static str,
}

impl DocumentModifyGuard {
    pub fn new(service: Arc<dyn DocumentOwnership>, entity: &'static str, param: &'static str) -> Self {
        Self { service, entity, param }
    }
}

#[async_trait]
impl Guard for DocumentModifyGuard {
    fn name(&self) -> &'static str {
        "DocumentModify"
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        let owner = ctx.principal()?;
        let document_id = ctx.param(self.param)?;

        if !self.service.can_modify(&owner.id, document_id).await? {
            tracing::warn!("{} may not modify {} {}", owner.id, self.entity, document_id);
            return Err(ApiError::forbidden(format!(
                "You can't modify {} with {}.",
                self.entity, document_id
            )));
        }
        Ok(())
    }

    fn depends_on(&self) -> Option<&str> {
        Some(self.param)
    }
}
