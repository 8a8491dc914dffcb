use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use todos_api::v1::{ErrorBody, Todo};
use todos_back::{app, AppState};
use tower::ServiceExt;

fn router() -> Router {
    app(Arc::new(AppState::in_memory()))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: &str) -> Todo {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos/", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

#[tokio::test]
async fn list_starts_empty() {
    let resp = router()
        .oneshot(empty_request("GET", "/api/todos/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn create_assigns_id_and_timestamps() {
    let app = router();
    let todo = create(
        &app,
        r#"{"title":"Buy milk","description":"2 litres","completed":false}"#,
    )
    .await;

    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.description.as_deref(), Some("2 litres"));
    assert!(!todo.completed);
    assert_eq!(todo.updated_at, Some(todo.created_at));

    let resp = app
        .oneshot(empty_request("GET", &format!("/api/todos/{}/", todo.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched, todo);
}

#[tokio::test]
async fn create_rejects_blank_title_with_detail() {
    let resp = router()
        .oneshot(json_request("POST", "/api/todos/", r#"{"title":"   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(body.detail.contains("blank"));
}

#[tokio::test]
async fn create_rejects_overlong_title() {
    let title = "x".repeat(201);
    let resp = router()
        .oneshot(json_request(
            "POST",
            "/api/todos/",
            &format!(r#"{{"title":"{title}"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = router();
    let first = create(&app, r#"{"title":"first"}"#).await;
    let second = create(&app, r#"{"title":"second"}"#).await;

    let resp = app
        .oneshot(empty_request("GET", "/api/todos/"))
        .await
        .unwrap();
    let todos: Vec<Todo> = body_json(resp).await;

    let ids: Vec<_> = todos.iter().map(|todo| todo.id.clone()).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn replace_keeps_server_owned_fields() {
    let app = router();
    let todo = create(&app, r#"{"title":"Draft"}"#).await;

    let body = r#"{"id":"00000000-0000-0000-0000-000000000000","title":"Final","description":null,"completed":true,"created_at":"2000-01-01T00:00:00Z","updated_at":"2000-01-01T00:00:00Z"}"#;
    let resp = app
        .oneshot(json_request("PUT", &format!("/api/todos/{}/", todo.id), body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Todo = body_json(resp).await;
    assert_eq!(replaced.id, todo.id);
    assert_eq!(replaced.created_at, todo.created_at);
    assert!(replaced.updated_at >= todo.updated_at);
    assert_eq!(replaced.title, "Final");
    assert!(replaced.completed);
}

#[tokio::test]
async fn replace_unknown_returns_404_with_detail() {
    let resp = router()
        .oneshot(json_request(
            "PUT",
            "/api/todos/00000000-0000-0000-0000-000000000000/",
            r#"{"title":"ghost"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.detail, "Not found.");
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = router();
    let todo = create(&app, r#"{"title":"Temporary"}"#).await;
    let uri = format!("/api/todos/{}/", todo.id);

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
