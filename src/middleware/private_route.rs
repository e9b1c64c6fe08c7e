use async_trait::async_trait;

use super::guard::{Guard, RequestContext};
use crate::error::ApiError;

/// Authorization guard: the request must carry a principal.
pub struct PrivateRoute;

#[async_trait]
impl Guard for PrivateRoute {
    fn name(&self) -> &'static str {
        "PrivateRoute"
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        ctx.principal().map(|_| ())
    }
}
