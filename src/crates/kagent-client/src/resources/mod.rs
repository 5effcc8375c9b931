//! Per-resource API clients
//!
//! Each client borrows a [`KagentClient`](crate::KagentClient). Methods take an
//! optional `user_id` that overrides the configured default.

mod feedback;
mod memories;
mod runs;
mod sessions;
mod teams;
mod tool_servers;
mod tools;

pub use feedback::FeedbackClient;
pub use memories::MemoryClient;
pub use runs::RunClient;
pub use sessions::SessionClient;
pub use teams::TeamClient;
pub use tool_servers::ToolServerClient;
pub use tools::ToolClient;
