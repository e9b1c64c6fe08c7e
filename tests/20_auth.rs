mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{app, register_body};
use six_cities_api::auth::Principal;

#[tokio::test]
async fn register_returns_public_user() {
    let app = app();
    let (status, body) = app
        .send(Method::POST, "/auth/register", None, Some(register_body("kate", "kate@mail.com")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "kate@mail.com");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = app();
    app.sign_up("kate", "kate@mail.com").await;

    let (status, body) = app
        .send(Method::POST, "/auth/register", None, Some(register_body("kate2", "kate@mail.com")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorType"], "HTTP_ERROR");
}

#[tokio::test]
async fn invalid_registration_lists_every_field() {
    let app = app();
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "", "email": "nope", "password": "123", "status": "pro" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["username", "email", "password"]);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = app();
    app.sign_up("kate", "kate@mail.com").await;

    let wrong = json!({ "email": "kate@mail.com", "password": "secret9" });
    let unknown = json!({ "email": "nobody@mail.com", "password": "secret1" });

    let (status_a, body_a) = app.send(Method::POST, "/auth/login", None, Some(wrong)).await;
    let (status_b, body_b) = app.send(Method::POST, "/auth/login", None, Some(unknown)).await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a, body_b);
    assert_eq!(body_a["errorType"], "AUTH_ERROR");
}

#[tokio::test]
async fn token_identifies_the_user() {
    let app = app();
    let (id, token) = app.sign_up("kate", "kate@mail.com").await;

    let (status, body) = app.get("/auth/login", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["email"], "kate@mail.com");

    let principal = app.state.tokens.verify(&token).unwrap();
    assert_eq!(principal, Principal::new(id, "kate@mail.com"));
}

#[tokio::test]
async fn logout_has_no_server_side_effect() {
    let app = app();
    let (_, token) = app.sign_up("kate", "kate@mail.com").await;

    let (status, body) = app.send(Method::DELETE, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get("/auth/login", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_requires_a_principal() {
    let app = app();
    let (status, body) = app.send(Method::DELETE, "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errorType"], "AUTH_ERROR");
}

#[tokio::test]
async fn bad_credentials_are_treated_as_anonymous() {
    let app = app();
    let (id, _) = app.sign_up("kate", "kate@mail.com").await;
    let principal = Principal::new(id, "kate@mail.com");

    let expired = app
        .state
        .tokens
        .issue_at(&principal, Utc::now() - Duration::hours(25))
        .unwrap();
    let fresh_enough = app
        .state
        .tokens
        .issue_at(&principal, Utc::now() - Duration::hours(23))
        .unwrap();

    // Public routes ignore broken credentials.
    for token in [expired.as_str(), "garbage"] {
        let (status, _) = app.get("/offers", Some(token)).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Private routes see no principal.
    let (status, _) = app.get("/auth/login", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/auth/login", Some(&fresh_enough)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = app();
    let (status, body) = app
        .send(Method::POST, "/auth/login", None, Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn body_above_two_megabytes_reaches_the_handler() {
    let app = app();
    let mut body = register_body("kate", "kate@mail.com");
    body["about"] = json!("x".repeat(3 * 1024 * 1024));

    let (status, body) = app.send(Method::POST, "/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["email"], "kate@mail.com");
}
