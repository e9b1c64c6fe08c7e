//! Request pipeline: the authenticator, per-route guards, the success
//! envelope and the exception filter chain.

pub mod auth;
pub mod document_exists;
pub mod document_modify;
pub mod exception;
pub mod guard;
pub mod private_route;
pub mod response;
pub mod validate_dto;
pub mod validate_id;

pub use auth::{authenticate, principal_from_headers};
pub use document_exists::DocumentExistsGuard;
pub use document_modify::DocumentModifyGuard;
pub use exception::{exception_filter_middleware, ErrorBody, ExceptionFilter, ExceptionFilterChain};
pub use guard::{guard_middleware, Guard, GuardChain, RequestContext};
pub use private_route::PrivateRoute;
pub use response::{ApiResponse, ApiResult};
pub use validate_dto::{parse_dto, Dto, ValidateDto};
pub use validate_id::ValidateId;
