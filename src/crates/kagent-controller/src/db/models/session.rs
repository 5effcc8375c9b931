//! Session model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::repository::{Entity, SqlValue};

/// A user's conversation with a team; owns its runs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    /// Unique per user; sessions are addressable by id or name
    pub name: String,
    pub team_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            name: name.into(),
            team_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Builder method to set the team
    pub fn with_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }
}

impl Entity for Session {
    const TABLE: &'static str = "session";
    const KIND: &'static str = "session";
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "team_id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.name.clone().into(),
            self.team_id.into(),
        ]
    }
}
