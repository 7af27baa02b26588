//! Shared helpers: an in-memory app plus request/response shorthands

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Duration;
use marina_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const STAFF_EMAIL: &str = "capitainerie@port.fr";
pub const STAFF_PASSWORD: &str = "amarrage-2024";

pub fn app() -> Router {
    build_router(AppState::in_memory(Duration::hours(24)), false)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register the staff account and log in, returning the bearer token.
pub async fn staff_token(app: &Router) -> String {
    let created = send(
        app,
        json_request(
            Method::POST,
            "/api/users",
            None,
            json!({ "username": "capitainerie", "email": STAFF_EMAIL, "password": STAFF_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let login = send(
        app,
        json_request(
            Method::POST,
            "/api/login",
            None,
            json!({ "email": STAFF_EMAIL, "password": STAFF_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    json_body(login).await["token"].as_str().unwrap().to_owned()
}

pub async fn create_catway(app: &Router, token: &str, number: i64) {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/catways",
            Some(token),
            json!({ "catwayNumber": number, "catwayType": "long" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

pub async fn book(
    app: &Router,
    token: &str,
    catway: i64,
    start: &str,
    end: &str,
) -> Response {
    send(
        app,
        json_request(
            Method::POST,
            &format!("/api/catways/{}/reservations", catway),
            Some(token),
            json!({
                "clientName": "Ada Lovelace",
                "boatName": "Analytical",
                "startDate": start,
                "endDate": end,
            }),
        ),
    )
    .await
}
