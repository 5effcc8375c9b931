//! HTTP request handlers, one module per resource

pub mod feedback;
pub mod health;
pub mod memories;
pub mod runs;
pub mod sessions;
pub mod teams;
pub mod tool_servers;
pub mod tools;

pub use feedback::{create_feedback, list_feedback};
pub use health::{health, version};
pub use memories::{create_memory, delete_memory, get_memory, list_memories, update_memory};
pub use runs::{get_run, invoke_session, invoke_session_stream, list_runs, list_session_runs};
pub use sessions::{create_session, delete_session, get_session, list_sessions, update_session};
pub use teams::{create_team, delete_team, get_team, list_teams, update_team};
pub use tool_servers::{
    create_tool_server, delete_tool_server, get_tool_server, list_server_tools, list_tool_servers,
    refresh_server_tools, update_tool_server,
};
pub use tools::{create_tool, delete_tool, get_tool, list_tools, update_tool};
