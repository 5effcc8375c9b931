//! Request extractors
//!
//! User identity comes from the `user_id` query parameter or the
//! `X-User-Id` header. There is no authentication; the value is trusted.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::convert::Infallible;

use crate::api::error::{ApiError, ApiResult};

/// Header carrying the user identity
pub const USER_ID_HEADER: &str = "x-user-id";

pub const USER_ID_REQUIRED: &str = "user_id is required";

#[derive(Debug, Deserialize)]
struct UserQuery {
    user_id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn user_from_parts(parts: &Parts) -> Option<String> {
    let from_query = Query::<UserQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| non_blank(q.user_id));

    from_query.or_else(|| {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        non_blank(header)
    })
}

/// Required user identity; rejects with 400 when absent or blank
#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts)
            .map(UserId)
            .ok_or_else(|| ApiError::BadRequest(USER_ID_REQUIRED.to_string()))
    }
}

/// User identity that may instead be supplied in a create body
#[derive(Debug, Clone)]
pub struct RequestUser(pub Option<String>);

impl RequestUser {
    /// The request's user, falling back to the body's `user_id`
    pub fn or_body(self, body: Option<String>) -> ApiResult<String> {
        self.0
            .or_else(|| non_blank(body))
            .ok_or_else(|| ApiError::BadRequest(USER_ID_REQUIRED.to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestUser(user_from_parts(parts)))
    }
}

/// JSON body whose rejections use the API error envelope
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
