use std::fs;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use arbor_api::{AppStateInner, router};
use arbor_db::{Posts, RefcodeGate, Store, Users};
use arbor_types::ErrorReporter;

struct PanicReporter;

impl ErrorReporter for PanicReporter {
    fn report(&self, tag: &'static str, err: &anyhow::Error) {
        panic!("unexpected store failure in {tag}: {err:?}");
    }
}

fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let refcodes = dir.path().join("refcodes.txt");
    fs::write(&refcodes, "testcode\n").unwrap();

    let store = Arc::new(Store::open_in_memory().unwrap());
    let reporter: Arc<dyn ErrorReporter> = Arc::new(PanicReporter);
    let state = Arc::new(AppStateInner {
        users: Users::new(store.clone(), reporter.clone(), 1),
        posts: Posts::new(store, reporter),
        gate: RefcodeGate::load(&refcodes),
    });
    (router(state), dir)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn signup_body(username: &str) -> Value {
    json!({
        "refcode": "testcode",
        "username": username,
        "first_name": "Test",
        "last_name": "User",
        "email": "test@example.com",
        "password": "hunter2hunter2",
        "col_no": 7,
        "avatar": "https://example.com/a.png",
    })
}

fn post_body(title: &str) -> Value {
    json!({
        "title": title,
        "author": "Test User",
        "datetime": "2021-10-24T06:50:30",
        "feature_img": "https://example.com/img.png",
        "content": "Hello, world.",
    })
}

#[tokio::test]
async fn home_route_greets() {
    let (app, _dir) = app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
}

#[tokio::test]
async fn signup_with_a_missing_field_is_400() {
    let (app, _dir) = app();
    let mut body = signup_body("kamrul");
    body.as_object_mut().unwrap().remove("email");

    let (status, body) = send(&app, "POST", "/users/signup", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have not provided enough information");
}

#[tokio::test]
async fn signup_with_a_bad_refcode_is_401() {
    let (app, _dir) = app();
    let mut body = signup_body("kamrul");
    body["refcode"] = json!("wrongcode");

    let (status, body) = send(&app, "POST", "/users/signup", Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Your reference code is incorrect");
}

#[tokio::test]
async fn duplicate_signup_is_400_user_exists() {
    let (app, _dir) = app();
    let (status, _) = send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn signup_login_fetch_logout_flow() {
    let (app, _dir) = app();
    let (status, _) = send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "username": "kamrul", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sessionkey = body["sessionkey"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/users/sk/{sessionkey}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "kamrul");

    let (status, _) = send(
        &app,
        "PUT",
        "/users/logout",
        Some(json!({ "sessionkey": sessionkey })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/users/sk/{sessionkey}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_failures_map_to_404_and_403() {
    let (app, _dir) = app();
    let (status, _) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "username": "ghost", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;
    let (status, body) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "username": "kamrul", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "The password you've provided is wrong");
}

#[tokio::test]
async fn logout_with_no_selector_is_400() {
    let (app, _dir) = app();
    let (status, _) = send(&app, "PUT", "/users/logout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_responses_exclude_credential_material() {
    let (app, _dir) = app();
    send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;

    let (status, body) = send(&app, "GET", "/users/un/kamrul", None).await;
    assert_eq!(status, StatusCode::OK);
    let user = body["user"].as_object().unwrap();
    assert!(user.contains_key("email"));
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("sessionkey"));
}

#[tokio::test]
async fn edit_over_http_patches_only_supplied_fields() {
    let (app, _dir) = app();
    send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;

    let (status, _) = send(
        &app,
        "PATCH",
        "/users/edit",
        Some(json!({
            "username": "kamrul",
            "oldPassword": "hunter2hunter2",
            "first_name": "Edited",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/users/un/kamrul", None).await;
    assert_eq!(body["user"]["first_name"], "Edited");
    assert_eq!(body["user"]["last_name"], "User");
}

#[tokio::test]
async fn delete_flow() {
    let (app, _dir) = app();
    send(&app, "POST", "/users/signup", Some(signup_body("kamrul"))).await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/users/delete",
        Some(json!({ "username": "kamrul", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        "/users/delete",
        Some(json!({ "username": "kamrul", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/users/un/kamrul", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn posts_crud_flow() {
    let (app, _dir) = app();

    let (status, body) = send(&app, "GET", "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"], json!([]));

    let (status, _) = send(&app, "POST", "/posts", Some(post_body("Test Post 01"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/posts", None).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    let slug = posts[0]["slug"].as_str().unwrap().to_string();
    let suffix = slug.strip_prefix("test-post-01-").unwrap();
    assert!(suffix.parse::<u32>().is_ok());

    let (status, body) = send(&app, "GET", &format!("/posts/{slug}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Test Post 01");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/posts/{slug}"),
        Some(json!({ "title": "New" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/posts/{slug}"), None).await;
    assert_eq!(body["post"]["title"], "New");
    assert_eq!(body["post"]["author"], "Test User");

    let (status, _) = send(&app, "DELETE", &format!("/posts/{slug}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/posts/{slug}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No post was found in that name");
}

#[tokio::test]
async fn post_create_with_a_missing_field_is_400() {
    let (app, _dir) = app();
    let mut body = post_body("Test Post 01");
    body.as_object_mut().unwrap().remove("content");

    let (status, body) = send(&app, "POST", "/posts", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have not provided enough information");
}
