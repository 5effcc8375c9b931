//! REST API layer
//!
//! Handlers translate requests into store calls and wrap results in the
//! `{status, data, message}` envelope. Invocations go through
//! [`crate::dispatch::RunDispatcher`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{create_router, AppState};
