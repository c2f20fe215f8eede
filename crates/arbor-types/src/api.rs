use serde::{Deserialize, Serialize};

use crate::models::{Post, PostEntry, PublicUser};

// Request fields are Option-typed on purpose: a missing key must produce
// the canned 400 response, not a deserialization reject. Handlers do the
// presence validation.

// -- Users --

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub refcode: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub col_no: Option<u32>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub username: Option<String>,
    pub sessionkey: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub username: Option<String>,
    #[serde(rename = "oldPassword")]
    pub old_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub col_no: Option<u32>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// -- Posts --

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub datetime: Option<String>,
    pub feature_img: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub datetime: Option<String>,
    pub feature_img: Option<String>,
    pub content: Option<String>,
}

// -- Responses --

/// Status-plus-message body used by every operation without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub code: u16,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub code: u16,
    pub sessionkey: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub code: u16,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub code: u16,
    pub posts: Vec<PostEntry>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub code: u16,
    pub post: Post,
}
