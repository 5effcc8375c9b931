//! kagent REST client library
//!
//! Typed wrappers over the controller's HTTP surface: sessions, runs, teams,
//! tools, tool servers, memories and feedback, plus streaming invocation over
//! Server-Sent Events.
//!
//! ```no_run
//! use kagent_client::{ClientConfig, KagentClient};
//!
//! # async fn demo() -> kagent_client::Result<()> {
//! let client = KagentClient::new(ClientConfig::new("http://localhost:8083").with_user_id("alice"))?;
//! for session in client.sessions().list(None).await? {
//!     println!("{} {}", session.id, session.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod sse;
pub mod types;

pub use client::KagentClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use sse::{SseDecoder, SseEvent};
