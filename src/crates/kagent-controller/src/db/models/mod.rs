//! Database models
//!
//! One row type per table. Timestamps are RFC 3339 strings; JSON columns
//! are TEXT wrapped in `sqlx::types::Json`.

pub mod feedback;
pub mod memory;
pub mod message;
pub mod run;
pub mod session;
pub mod team;
pub mod tool;
pub mod tool_server;

pub use feedback::{Feedback, FeedbackIssueType};
pub use memory::Memory;
pub use message::Message;
pub use run::{Run, RunStatus};
pub use session::Session;
pub use team::Team;
pub use tool::Tool;
pub use tool_server::ToolServer;
