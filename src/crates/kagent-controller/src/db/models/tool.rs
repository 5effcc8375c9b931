//! Tool model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::db::repository::{Entity, SqlValue};

/// An invocable capability, optionally hosted by a tool server
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tool {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Json<Value>,
    pub server_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Tool {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, component: Value) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            name: name.into(),
            component: Json(component),
            server_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn on_server(mut self, server_id: i64) -> Self {
        self.server_id = Some(server_id);
        self
    }
}

impl Entity for Tool {
    const TABLE: &'static str = "tool";
    const KIND: &'static str = "tool";
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "component", "server_id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.name.clone().into(),
            self.component.0.clone().into(),
            self.server_id.into(),
        ]
    }
}
