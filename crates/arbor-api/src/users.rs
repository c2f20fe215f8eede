use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use arbor_types::api::{
    DeleteUserRequest, EditUserRequest, LoginRequest, LoginResponse, LogoutRequest,
    MessageResponse, SignupRequest, UserResponse,
};
use arbor_types::{NewUser, Selector, UserPatch};

use crate::error::ApiError;
use crate::{AppState, messages};

/// Presence check for a required string field: missing and empty both read
/// as "not provided".
pub(crate) fn required(field: &Option<String>) -> Result<&str, ApiError> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::MissingFields),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let refcode = required(&req.refcode)?.to_string();
    let user = NewUser {
        username: required(&req.username)?.to_string(),
        first_name: required(&req.first_name)?.to_string(),
        last_name: required(&req.last_name)?.to_string(),
        email: required(&req.email)?.to_string(),
        password: required(&req.password)?.to_string(),
        col_no: req.col_no.ok_or(ApiError::MissingFields)?,
        avatar: required(&req.avatar)?.to_string(),
    };

    if !state.gate.check(&refcode) {
        return Err(ApiError::BadRefcode);
    }

    state
        .users
        .register(user)
        .await
        .map_err(ApiError::from_user_op)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            code: 201,
            message: messages::USER_CREATED,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = required(&req.username)?;
    let password = required(&req.password)?;

    let sessionkey = state
        .users
        .authenticate(username, password)
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(LoginResponse {
        code: 200,
        sessionkey,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Username wins when both are supplied.
    let selector = match (required(&req.username), required(&req.sessionkey)) {
        (Ok(username), _) => Selector::ByUsername(username.to_string()),
        (_, Ok(sessionkey)) => Selector::BySessionKey(sessionkey.to_string()),
        _ => return Err(ApiError::MissingFields),
    };

    state
        .users
        .invalidate_session(selector)
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(MessageResponse {
        code: 200,
        message: messages::LOGGED_OUT,
    }))
}

pub async fn edit(
    State(state): State<AppState>,
    Json(req): Json<EditUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = required(&req.username)?.to_string();
    let old_password = required(&req.old_password)?.to_string();

    let patch = UserPatch {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password: req.password,
        col_no: req.col_no,
        avatar: req.avatar,
    };

    state
        .users
        .edit(&username, patch, &old_password)
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(MessageResponse {
        code: 200,
        message: messages::USER_EDITED,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<DeleteUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = required(&req.username)?;
    let password = required(&req.password)?;

    state
        .users
        .delete(username, password)
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(MessageResponse {
        code: 200,
        message: messages::USER_DELETED,
    }))
}

pub async fn fetch_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let entry = state
        .users
        .fetch(Selector::ByUsername(username))
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(UserResponse {
        code: 200,
        user: entry.into(),
    }))
}

pub async fn fetch_by_sessionkey(
    State(state): State<AppState>,
    Path(sessionkey): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let entry = state
        .users
        .fetch(Selector::BySessionKey(sessionkey))
        .await
        .map_err(ApiError::from_user_op)?;

    Ok(Json(UserResponse {
        code: 200,
        user: entry.into(),
    }))
}
