//! Tool server model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::db::repository::{now_timestamp, Entity, SqlValue};

/// A server that hosts tools; deleting it deletes them
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolServer {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Json<Value>,
    pub last_connected: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ToolServer {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, component: Value) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            name: name.into(),
            component: Json(component),
            last_connected: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn touch_connected(&mut self) {
        self.last_connected = Some(now_timestamp());
    }
}

impl Entity for ToolServer {
    const TABLE: &'static str = "toolserver";
    const KIND: &'static str = "tool server";
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "component", "last_connected"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.name.clone().into(),
            self.component.0.clone().into(),
            self.last_connected.clone().into(),
        ]
    }
}
