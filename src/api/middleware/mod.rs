pub mod auth;
pub mod request_id;

pub use auth::{AuthUser, RequireAuth};
pub use request_id::RequestIdMiddleware;
