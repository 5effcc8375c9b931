//! Message model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::db::repository::{Entity, SqlValue};

/// A message produced during a run
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub user_id: String,
    pub session_id: Option<i64>,
    pub run_id: Option<i64>,
    /// The message as emitted by the agent framework
    pub config: Json<Value>,
    pub message_meta: Option<Json<Value>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Message {
    pub fn new(user_id: impl Into<String>, config: Value) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            session_id: None,
            run_id: None,
            config: Json(config),
            message_meta: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Attach to a run and its session
    pub fn for_run(mut self, session_id: i64, run_id: i64) -> Self {
        self.session_id = Some(session_id);
        self.run_id = Some(run_id);
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.message_meta = Some(Json(meta));
        self
    }
}

impl Entity for Message {
    const TABLE: &'static str = "message";
    const KIND: &'static str = "message";
    const COLUMNS: &'static [&'static str] =
        &["user_id", "session_id", "run_id", "config", "message_meta"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.session_id.into(),
            self.run_id.into(),
            self.config.0.clone().into(),
            self.message_meta.as_ref().map(|m| m.0.clone()).into(),
        ]
    }
}
