pub mod error;
pub mod messages;
pub mod posts;
pub mod reporter;
pub mod users;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde_json::json;

use arbor_db::{Posts, RefcodeGate, Users};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: Users,
    pub posts: Posts,
    pub gate: RefcodeGate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/users/logout", put(users::logout))
        .route("/users/edit", patch(users::edit))
        .route("/users/delete", delete(users::remove))
        .route("/users/un/{username}", get(users::fetch_by_username))
        .route("/users/sk/{sessionkey}", get(users::fetch_by_sessionkey))
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/{slug}",
            get(posts::fetch).patch(posts::edit).delete(posts::remove),
        )
        .with_state(state)
}

async fn home() -> Json<serde_json::Value> {
    Json(json!({ "code": 200, "message": messages::HOME }))
}
