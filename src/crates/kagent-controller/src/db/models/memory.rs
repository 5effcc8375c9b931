//! Memory provider model for database persistence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::db::repository::{Entity, SqlValue};

/// A registered memory provider (e.g. a vector store)
///
/// Only a reference to the secret holding the API key is kept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Memory {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub provider: String,
    pub api_key_secret_ref: String,
    pub api_key_secret_key: String,
    pub memory_params: Json<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl Memory {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            name: name.into(),
            provider: provider.into(),
            api_key_secret_ref: String::new(),
            api_key_secret_key: String::new(),
            memory_params: Json(Value::Object(Default::default())),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl Entity for Memory {
    const TABLE: &'static str = "memory";
    const KIND: &'static str = "memory";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "name",
        "provider",
        "api_key_secret_ref",
        "api_key_secret_key",
        "memory_params",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.name.clone().into(),
            self.provider.clone().into(),
            self.api_key_secret_ref.clone().into(),
            self.api_key_secret_key.clone().into(),
            self.memory_params.0.clone().into(),
        ]
    }
}
