//! CORS middleware configuration

use tower_http::cors::{Any, CorsLayer};

/// Allow any origin; the UI and CLI talk to the controller directly
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
