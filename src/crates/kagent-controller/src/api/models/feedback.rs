//! Feedback DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validate_not_empty;
use crate::db::models::FeedbackIssueType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    /// Rated message, if any
    #[serde(default)]
    pub message_id: Option<i64>,
    pub is_positive: bool,
    pub feedback_text: String,
    /// One of `instructions`, `factual`, `incomplete`, `tool`
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateFeedbackRequest {
    /// Validate and return the parsed issue type
    pub fn validate(&self) -> ApiResult<Option<FeedbackIssueType>> {
        validate_not_empty(&self.feedback_text, "feedback_text")?;
        self.issue_type
            .as_deref()
            .map(|s| s.parse::<FeedbackIssueType>().map_err(ApiError::BadRequest))
            .transpose()
    }
}
