//! API middleware layer
//!
//! CORS, request tracing and the validation helpers shared by handlers.

pub mod cors;
pub mod logging;
pub mod validation;

pub use cors::cors_layer;
pub use logging::logging_layer;
pub use validation::{component_label, parse_id, require_object, validate_not_empty};
