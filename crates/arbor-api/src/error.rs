use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use arbor_types::StoreError;

use crate::messages;

/// Everything a handler can fail with, mapped one-to-one onto response
/// codes and canned messages. 500s carry the tracking tag of the failing
/// operation and nothing else.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required fields")]
    MissingFields,

    #[error("invalid referral code")]
    BadRefcode,

    #[error("user already exists")]
    UserExists,

    #[error("password mismatch")]
    WrongPassword,

    #[error("user not found")]
    UserNotFound,

    #[error("post not found")]
    PostNotFound,

    #[error("store unavailable ({0})")]
    Unavailable(&'static str),
}

impl ApiError {
    pub fn from_user_op(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ApiError::UserExists,
            StoreError::Forbidden => ApiError::WrongPassword,
            StoreError::NotFound => ApiError::UserNotFound,
            StoreError::Unavailable { tag } => ApiError::Unavailable(tag),
        }
    }

    pub fn from_post_op(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::PostNotFound,
            StoreError::Unavailable { tag } => ApiError::Unavailable(tag),
            // Post operations have no conflict/credential paths; treat a
            // stray variant as the not-found it would read as.
            StoreError::Conflict | StoreError::Forbidden => ApiError::PostNotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, tag) = match self {
            ApiError::MissingFields => (StatusCode::BAD_REQUEST, messages::MISSING_FIELDS, None),
            ApiError::BadRefcode => (StatusCode::UNAUTHORIZED, messages::BAD_REFCODE, None),
            ApiError::UserExists => (StatusCode::BAD_REQUEST, messages::USER_EXISTS, None),
            ApiError::WrongPassword => (StatusCode::FORBIDDEN, messages::WRONG_PASSWORD, None),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, messages::USER_NOT_FOUND, None),
            ApiError::PostNotFound => (StatusCode::NOT_FOUND, messages::POST_NOT_FOUND, None),
            ApiError::Unavailable(tag) => {
                (StatusCode::INTERNAL_SERVER_ERROR, messages::SERVER_ERROR, Some(tag))
            }
        };

        let mut body = serde_json::json!({
            "code": status.as_u16(),
            "message": message,
        });
        if let Some(tag) = tag {
            body["error"] = tag.into();
        }

        (status, Json(body)).into_response()
    }
}
