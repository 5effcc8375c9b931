//! Team model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::db::repository::{Entity, SqlValue};

/// A named, versioned agent-team configuration
///
/// `component` is the opaque graph description handed to the agent
/// framework; it is stored and returned as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Json<Value>,
    /// Starts at 1, bumped on every update
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Team {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, component: Value) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            name: name.into(),
            component: Json(component),
            version: 1,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl Entity for Team {
    const TABLE: &'static str = "team";
    const KIND: &'static str = "team";
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "component", "version"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.name.clone().into(),
            self.component.0.clone().into(),
            self.version.into(),
        ]
    }
}
