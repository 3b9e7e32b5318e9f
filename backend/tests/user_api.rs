//! End-to-end tests for registration, token issue and the profile endpoint.

mod support;

use actix_web::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use support::{PASSWORD, backend, init_app, json_request, send, sign_up, token_for};

#[actix_rt::test]
async fn registration_normalises_the_email_domain() {
    let app = init_app(backend().state).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/user/create",
            None,
            Some(json!({ "email": "Cook@EXAMPLE.com", "password": PASSWORD, "name": "Cook" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "email": "Cook@example.com", "name": "Cook" }));
    assert!(body.get("password").is_none());

    let token = token_for(&app, "Cook@example.com", PASSWORD).await;
    assert!(!token.is_empty());
}

#[actix_rt::test]
async fn duplicate_email_is_rejected() {
    let app = init_app(backend().state).await;
    sign_up(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/user/create",
            None,
            Some(json!({ "email": "dup@EXAMPLE.COM", "password": PASSWORD })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "email");
    assert_eq!(body["details"]["code"], "unique");
}

#[actix_rt::test]
async fn short_password_is_rejected_and_nothing_is_stored() {
    let app = init_app(backend().state).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/user/create",
            None,
            Some(json!({ "email": "short@example.com", "password": "pw", "name": "Short" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "min_length");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/user/token",
            None,
            Some(json!({ "email": "short@example.com", "password": "pw" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[rstest]
#[case::wrong_password(json!({ "email": "login@example.com", "password": "badpass" }))]
#[case::unknown_user(json!({ "email": "ghost@example.com", "password": PASSWORD }))]
#[case::blank_password(json!({ "email": "login@example.com", "password": "" }))]
#[actix_rt::test]
async fn token_requests_fail_without_revealing_the_cause(#[case] payload: serde_json::Value) {
    let app = init_app(backend().state).await;
    sign_up(&app, "login@example.com").await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/v1/user/token", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
    assert_eq!(body["code"], "invalid_request");
}

#[actix_rt::test]
async fn profile_requires_authentication() {
    let app = init_app(backend().state).await;

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/v1/user/me", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/v1/user/me", Some("not-a-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn profile_round_trip_and_password_change() {
    let app = init_app(backend().state).await;
    let token = sign_up(&app, "me@example.com").await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/v1/user/me", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "email": "me@example.com", "name": "Test Name" }));

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/v1/user/me",
            Some(&token),
            Some(json!({ "name": "New Name", "password": "newpassword123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "New Name");

    token_for(&app, "me@example.com", "newpassword123").await;
}

#[rstest]
#[case(Method::POST)]
#[case(Method::DELETE)]
#[actix_rt::test]
async fn unsupported_profile_methods_return_405(#[case] method: Method) {
    let app = init_app(backend().state).await;
    let token = sign_up(&app, "verbs@example.com").await;

    let (status, _) = send(
        &app,
        json_request(method, "/api/v1/user/me", Some(&token), Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
