use axum::http::StatusCode;
use serde_json::json;
use silent_notes::modules::auth::interface::AccountStore;
use silent_notes::modules::auth::model::Verification;
use silent_notes::modules::auth::verification::RegistrationOrder;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn sign_up_with_valid_data_returns_created() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/v1/sign-up")
        .json(&json!({
            "username": "alice",
            "email": test_email("alice"),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status_code"], 201);
    let id = body["data"]["userId"].as_str().unwrap();
    assert!(body["data"].get("password").is_none());

    let account = ctx.accounts.find_by_id(id).await.unwrap().unwrap();
    assert!(account.accepting_messages);
    match account.verification {
        Verification::Pending { code, .. } => {
            assert_eq!(code, ctx.outbox.last_code_for("alice"));
        }
        other => panic!("new accounts must be pending, got {:?}", other),
    }
}

#[tokio::test]
async fn sign_up_with_duplicate_email_returns_conflict() {
    let ctx = TestContext::new().await;
    ctx.sign_up("alice").await;

    let response = ctx
        .server
        .post("/api/v1/sign-up")
        .json(&json!({
            "username": "bob",
            "email": test_email("alice"),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn sign_up_with_duplicate_username_returns_conflict() {
    let ctx = TestContext::new().await;
    ctx.sign_up("alice").await;

    let response = ctx
        .server
        .post("/api/v1/sign-up")
        .json(&json!({
            "username": "alice",
            "email": "another@example.com",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn sign_up_with_invalid_fields_returns_bad_request() {
    let ctx = TestContext::new().await;

    for body in [
        json!({ "username": "al", "email": test_email("al"), "password": test_password() }),
        json!({ "username": "a".repeat(31), "email": "long@example.com", "password": test_password() }),
        json!({ "username": "alice", "email": "not-an-email", "password": test_password() }),
        json!({ "username": "alice", "email": test_email("alice") }),
    ] {
        let response = ctx.server.post("/api/v1/sign-up").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body.get("error").is_some());
    }

    assert!(ctx.accounts.is_empty().await);
}

#[tokio::test]
async fn sign_up_fails_without_persisting_when_mail_is_down() {
    let ctx = TestContext::new().await;
    ctx.outbox.set_failing(true);

    let response = ctx
        .server
        .post("/api/v1/sign-up")
        .json(&json!({
            "username": "alice",
            "email": test_email("alice"),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "error sending email verification code");
    assert_eq!(body["error"], "internal error");

    assert!(ctx.accounts.is_empty().await);

    // Nothing was persisted, so the same details can be used once mail recovers.
    ctx.outbox.set_failing(false);
    ctx.sign_up("alice").await;
}

#[tokio::test]
async fn persist_first_keeps_account_when_mail_is_down() {
    let ctx = TestContext::with_order(RegistrationOrder::PersistFirst).await;
    ctx.outbox.set_failing(true);

    let response = ctx
        .server
        .post("/api/v1/sign-up")
        .json(&json!({
            "username": "alice",
            "email": test_email("alice"),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ctx.accounts.len().await, 1);
}

#[tokio::test]
async fn sign_up_treats_usernames_and_emails_case_insensitively() {
    let ctx = TestContext::new().await;
    ctx.sign_up("alice").await;

    for body in [
        json!({ "username": "Alice", "email": "another@example.com", "password": test_password() }),
        json!({ "username": "bob", "email": "ALICE@example.com", "password": test_password() }),
    ] {
        ctx.server
            .post("/api/v1/sign-up")
            .json(&body)
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    assert_eq!(ctx.accounts.len().await, 1);
}
