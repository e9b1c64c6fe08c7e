mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{app, MISSING_ID};

#[tokio::test]
async fn comment_on_missing_offer_never_reaches_handler() {
    let app = app();
    let (_, token) = app.sign_up("kate", "kate@mail.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/offers/{}/comments", MISSING_ID),
            Some(&token),
            Some(json!({ "text": "Should never be stored", "rating": 4 })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorType"], "HTTP_ERROR");
    assert!(app.state.comments.find_by_offer(MISSING_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn comments_update_offer_stats() {
    let app = app();
    let (_, owner) = app.sign_up("kate", "kate@mail.com").await;
    let (_, guest) = app.sign_up("bob", "bob@mail.com").await;
    let offer_id = app.create_offer(&owner, "Brussels", false).await;
    let uri = format!("/offers/{}/comments", offer_id);

    for rating in [5, 4, 4] {
        let (status, body) = app
            .send(
                Method::POST,
                &uri,
                Some(&guest),
                Some(json!({ "text": "Good location, clean rooms", "rating": rating })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["author"]["email"], "bob@mail.com");
    }

    let (_, body) = app.get(&format!("/offers/{}", offer_id), None).await;
    assert_eq!(body["data"]["commentCount"], 3);
    assert_eq!(body["data"]["rating"], 4.3);

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn comment_validation_and_authorization() {
    let app = app();
    let (_, token) = app.sign_up("kate", "kate@mail.com").await;
    let offer_id = app.create_offer(&token, "Cologne", false).await;
    let uri = format!("/offers/{}/comments", offer_id);

    let (status, _) = app
        .send(Method::POST, &uri, None, Some(json!({ "text": "Anonymous words", "rating": 3 })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "text": "ok", "rating": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let (_, body) = app.get(&uri, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
