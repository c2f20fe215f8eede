use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rand::Rng;

use arbor_types::api::{
    CreatePostRequest, EditPostRequest, MessageResponse, PostResponse, PostsResponse,
};
use arbor_types::{Post, PostPatch};

use crate::error::ApiError;
use crate::users::required;
use crate::{AppState, messages};

pub async fn list(State(state): State<AppState>) -> Result<Json<PostsResponse>, ApiError> {
    let posts = state.posts.list().await.map_err(ApiError::from_post_op)?;
    Ok(Json(PostsResponse { code: 200, posts }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = Post {
        title: required(&req.title)?.to_string(),
        author: required(&req.author)?.to_string(),
        datetime: required(&req.datetime)?.to_string(),
        feature_img: required(&req.feature_img)?.to_string(),
        content: required(&req.content)?.to_string(),
    };

    let slug = derive_slug(&post.title);
    state
        .posts
        .create(&slug, post)
        .await
        .map_err(ApiError::from_post_op)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            code: 201,
            message: messages::POST_CREATED,
        }),
    ))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .posts
        .fetch(&slug)
        .await
        .map_err(ApiError::from_post_op)?;
    Ok(Json(PostResponse { code: 200, post }))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<EditPostRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = PostPatch {
        title: req.title,
        author: req.author,
        datetime: req.datetime,
        feature_img: req.feature_img,
        content: req.content,
    };

    state
        .posts
        .edit(&slug, patch)
        .await
        .map_err(ApiError::from_post_op)?;

    Ok(Json(MessageResponse {
        code: 200,
        message: messages::POST_EDITED,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .posts
        .delete(&slug)
        .await
        .map_err(ApiError::from_post_op)?;

    Ok(Json(MessageResponse {
        code: 200,
        message: messages::POST_DELETED,
    }))
}

/// URL-safe key for a new post: the sanitized title plus a random numeric
/// suffix to keep collision odds negligible.
fn derive_slug(title: &str) -> String {
    let suffix: u32 = rand::rng().random_range(1..=1_000_000);
    slugify(&format!("{title} {suffix}"))
}

/// Lowercase, drop everything but `[a-z0-9_ ]`, collapse space runs to
/// single hyphens.
fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_gap = false;
    for c in raw.to_lowercase().chars() {
        if c == ' ' {
            pending_gap = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_gap && !slug.is_empty() {
                slug.push('-');
            }
            pending_gap = false;
            slug.push(c);
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::{derive_slug, slugify};

    #[test]
    fn slugify_sanitizes_titles() {
        assert_eq!(slugify("Test Post 01 42"), "test-post-01-42");
        assert_eq!(slugify("Hello, World! 7"), "hello-world-7");
        assert_eq!(slugify("  spaced   out  9"), "spaced-out-9");
        assert_eq!(slugify("snake_case stays 3"), "snake_case-stays-3");
        assert_eq!(slugify("déjà vu 5"), "dj-vu-5");
    }

    #[test]
    fn derive_slug_appends_a_numeric_suffix() {
        let slug = derive_slug("Test Post 01");
        let suffix = slug
            .strip_prefix("test-post-01-")
            .expect("slug should keep the sanitized title as prefix");
        let n: u32 = suffix.parse().expect("suffix should be numeric");
        assert!((1..=1_000_000).contains(&n));
    }

    #[test]
    fn derive_slug_varies_between_calls() {
        // One collision in a million is possible; two back-to-back pairs
        // colliding is not worth worrying about.
        let slugs: Vec<String> = (0..4).map(|_| derive_slug("A Title")).collect();
        assert!(slugs.windows(2).any(|w| w[0] != w[1]));
    }
}
