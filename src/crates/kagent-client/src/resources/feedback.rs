use crate::client::KagentClient;
use crate::error::Result;
use crate::types::{CreateFeedbackRequest, Feedback};
use reqwest::Method;

pub struct FeedbackClient<'a> {
    client: &'a KagentClient,
}

impl<'a> FeedbackClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Feedback>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "feedback"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(
        &self,
        request: &CreateFeedbackRequest,
        user_id: Option<&str>,
    ) -> Result<Feedback> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "feedback"], Some(user), Some(request))
            .await
    }
}
