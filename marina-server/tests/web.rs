//! Staff web UI tests: cookie login, redirects and form re-rendering

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use common::*;

fn form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn page(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_owned()
}

/// Register the staff account, log in through the form, return the cookie pair.
async fn web_login(app: &Router) -> String {
    staff_token(app).await;
    let response = send(
        app,
        form(
            "/login",
            None,
            &format!(
                "email={}&password={}",
                urlencoding::encode(STAFF_EMAIL),
                STAFF_PASSWORD
            ),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_owned()
}

#[tokio::test]
async fn login_page_is_public() {
    let app = app();
    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("action=\"/login\""));
}

#[tokio::test]
async fn protected_pages_redirect_to_login() {
    let app = app();
    let response = send(&app, get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?error="));
}

#[tokio::test]
async fn bad_login_redirects_with_error() {
    let app = app();
    staff_token(&app).await;
    let response = send(&app, form("/login", None, "email=nobody%40port.fr&password=whatever1")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?error="));
}

#[tokio::test]
async fn dashboard_greets_the_user() {
    let app = app();
    let cookie = web_login(&app).await;
    let response = send(&app, page("/dashboard", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("Welcome, capitainerie."));
}

#[tokio::test]
async fn booking_through_the_form() {
    let app = app();
    let cookie = web_login(&app).await;

    let response = send(&app, form("/catways/add", Some(&cookie), "catwayNumber=3&catwayType=long&catwayState=")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/catways?success="));

    let booking = "catwayNumber=3&clientName=Ada&boatName=Gull&startDate=2024-06-01&endDate=2024-06-10";
    let response = send(&app, form("/reservations/add", Some(&cookie), booking)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/reservations?success="));

    let list = text_body(send(&app, page("/reservations", &cookie)).await).await;
    assert!(list.contains("Gull"));
}

#[tokio::test]
async fn conflicting_booking_re_renders_the_form() {
    let app = app();
    let cookie = web_login(&app).await;
    send(&app, form("/catways/add", Some(&cookie), "catwayNumber=3")).await;
    send(
        &app,
        form(
            "/reservations/add",
            Some(&cookie),
            "catwayNumber=3&clientName=Ada&boatName=Gull&startDate=2024-06-01&endDate=2024-06-10",
        ),
    )
    .await;

    let response = send(
        &app,
        form(
            "/reservations/add",
            Some(&cookie),
            "catwayNumber=3&clientName=Grace&boatName=Cobol&startDate=2024-06-10&endDate=2024-06-15",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("already reserved"));
    assert!(html.contains("value=\"Grace\""));
}

#[tokio::test]
async fn booking_an_unknown_catway_reports_the_catway() {
    let app = app();
    let cookie = web_login(&app).await;

    let response = send(
        &app,
        form(
            "/reservations/add",
            Some(&cookie),
            "catwayNumber=99&clientName=Ada&boatName=Gull&startDate=2024-09-10&endDate=2024-09-05",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("catway &#39;99&#39; not found"));
}

#[tokio::test]
async fn user_form_requires_matching_confirmation() {
    let app = app();
    let cookie = web_login(&app).await;
    let response = send(
        &app,
        form(
            "/users/add",
            Some(&cookie),
            "username=deck&email=deck%40port.fr&password=longenough&confirmPassword=different1",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("class=\"error\""));
}

#[tokio::test]
async fn cannot_delete_own_account_from_the_web() {
    let app = app();
    let cookie = web_login(&app).await;
    let uri = format!("/users/{}/delete", urlencoding::encode(STAFF_EMAIL));
    let response = send(&app, form(&uri, Some(&cookie), "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/users?error="));
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = app();
    let cookie = web_login(&app).await;
    let response = send(&app, page("/logout", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let after = send(&app, page("/dashboard", &cookie)).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}
