use async_trait::async_trait;
use uuid::Uuid;

use super::guard::{Guard, RequestContext};
use crate::error::ApiError;

/// The named path parameter must be a well-formed document id.
pub struct ValidateId {
    param: &'static str,
}

impl ValidateId {
    pub fn new(param: &'static str) -> Self {
        Self { param }
    }
}

#[async_trait]
impl Guard for ValidateId {
    fn name(&self) -> &'static str {
        "ValidateId"
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        let raw = ctx.param(self.param)?;
        Uuid::parse_str(raw)
            .map(|_| ())
            .map_err(|_| ApiError::bad_request(format!("{} is invalid id", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(value: &str) -> RequestContext {
        let mut ctx = RequestContext::default();
        ctx.params.insert("offerId".to_string(), value.to_string());
        ctx
    }

    #[tokio::test]
    async fn uuid_passes_and_garbage_fails() {
        let guard = ValidateId::new("offerId");
        assert!(guard.check(&ctx("0b7d5b3e-52d5-4d4e-9a8a-8c3f0e6c3c11")).await.is_ok());

        let err = guard.check(&ctx("not-an-id")).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
