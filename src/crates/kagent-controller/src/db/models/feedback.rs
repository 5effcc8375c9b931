//! Feedback model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::db::repository::{Entity, SqlValue};

/// Category of a negative rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FeedbackIssueType {
    Instructions,
    Factual,
    Incomplete,
    Tool,
}

impl FeedbackIssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackIssueType::Instructions => "instructions",
            FeedbackIssueType::Factual => "factual",
            FeedbackIssueType::Incomplete => "incomplete",
            FeedbackIssueType::Tool => "tool",
        }
    }
}

impl FromStr for FeedbackIssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instructions" => Ok(FeedbackIssueType::Instructions),
            "factual" => Ok(FeedbackIssueType::Factual),
            "incomplete" => Ok(FeedbackIssueType::Incomplete),
            "tool" => Ok(FeedbackIssueType::Tool),
            other => Err(format!(
                "invalid issue_type '{}': expected instructions, factual, incomplete or tool",
                other
            )),
        }
    }
}

/// A user rating of a message
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: String,
    pub message_id: Option<i64>,
    pub is_positive: bool,
    pub feedback_text: String,
    pub issue_type: Option<FeedbackIssueType>,
    pub created_at: String,
    pub updated_at: String,
}

impl Feedback {
    pub fn new(user_id: impl Into<String>, is_positive: bool, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id: user_id.into(),
            message_id: None,
            is_positive,
            feedback_text: text.into(),
            issue_type: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl Entity for Feedback {
    const TABLE: &'static str = "feedback";
    const KIND: &'static str = "feedback";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "message_id",
        "is_positive",
        "feedback_text",
        "issue_type",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.clone().into(),
            self.message_id.into(),
            self.is_positive.into(),
            self.feedback_text.clone().into(),
            self.issue_type.map(|t| t.as_str()).into(),
        ]
    }
}
