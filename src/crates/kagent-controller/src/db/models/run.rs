//! Run model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;

use crate::db::repository::{Entity, SqlValue};

/// Lifecycle of a run
///
/// `created -> active -> {complete, error}`. `Stopped` is a valid stored
/// value but nothing transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RunStatus {
    Created,
    Active,
    Complete,
    Error,
    Stopped,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Created => "created",
            RunStatus::Active => "active",
            RunStatus::Complete => "complete",
            RunStatus::Error => "error",
            RunStatus::Stopped => "stopped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Complete | RunStatus::Error | RunStatus::Stopped)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution attempt of a task within a session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Run {
    pub id: i64,
    pub user_id: String,
    pub session_id: i64,
    pub status: RunStatus,
    pub task: Json<Value>,
    pub team_result: Option<Json<Value>>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Run {
    /// New `created` run for a user-submitted task
    pub fn new(user_id: impl Into<String>, session_id: i64, task: &str) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            session_id,
            status: RunStatus::Created,
            task: Json(json!({ "content": task, "source": "user" })),
            team_result: None,
            error_message: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn mark_active(&mut self) {
        self.status = RunStatus::Active;
    }

    pub fn mark_complete(&mut self, team_result: Value) {
        self.status = RunStatus::Complete;
        self.team_result = Some(Json(team_result));
        self.error_message = None;
    }

    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Error;
        self.error_message = Some(message.into());
    }
}

impl Entity for Run {
    const TABLE: &'static str = "run";
    const KIND: &'static str = "run";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "session_id",
        "status",
        "task",
        "team_result",
        "error_message",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.session_id.into(),
            self.status.as_str().into(),
            self.task.0.clone().into(),
            self.team_result.as_ref().map(|r| r.0.clone()).into(),
            self.error_message.clone().into(),
        ]
    }
}
