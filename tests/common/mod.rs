use async_trait::async_trait;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use silent_notes::modules::auth::memory::MemoryAccountStore;
use silent_notes::modules::auth::verification::RegistrationOrder;
use silent_notes::modules::message::memory::MemoryMessageStore;
use silent_notes::services::jwt::JwtService;
use silent_notes::services::notifier::{Notifier, NotifyError};
use silent_notes::config::{init_db, DbPool};
use silent_notes::AppState;

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Captures every code the app tries to mail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, u32)>>,
    failing: AtomicBool,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn codes_for(&self, username: &str) -> Vec<u32> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _, _)| name == username)
            .map(|(_, _, code)| *code)
            .collect()
    }

    pub fn last_code_for(&self, username: &str) -> u32 {
        *self
            .codes_for(username)
            .last()
            .expect("no code was sent to this user")
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_verification_code(
        &self,
        username: &str,
        email: &str,
        code: u32,
    ) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected {
                status: 503,
                body: "mail provider unavailable".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((username.to_string(), email.to_string(), code));
        Ok(())
    }
}

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub accounts: Arc<MemoryAccountStore>,
    pub outbox: Arc<RecordingNotifier>,
    pub jwt: JwtService,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        Self::with_order(RegistrationOrder::NotifyFirst).await
    }

    pub async fn with_order(order: RegistrationOrder) -> Self {
        let accounts = Arc::new(MemoryAccountStore::new());
        let outbox = Arc::new(RecordingNotifier::default());

        let state = AppState::new(
            accounts.clone(),
            Arc::new(MemoryMessageStore::new()),
            outbox.clone(),
            JwtService::new(JWT_SECRET.to_string()),
            order,
        );
        let app = silent_notes::create_app(state, HeaderValue::from_static("http://localhost:3000"));
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            accounts,
            outbox,
            jwt: JwtService::new(JWT_SECRET.to_string()),
        }
    }

    pub async fn sign_up(&self, username: &str) -> String {
        let response = self
            .server
            .post("/api/v1/sign-up")
            .json(&json!({
                "username": username,
                "email": test_email(username),
                "password": test_password()
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["data"]["userId"].as_str().unwrap().to_string()
    }

    pub async fn verify(&self, username: &str) {
        let code = self.outbox.last_code_for(username);
        self.server
            .put(&format!("/api/v1/verify?username={}&code={}", username, code))
            .await
            .assert_status_ok();
    }

    /// Register, verify and sign in; returns the account id and session token.
    pub async fn signed_in(&self, username: &str) -> (String, String) {
        let id = self.sign_up(username).await;
        self.verify(username).await;

        let response = self
            .server
            .post("/api/v1/sign-in")
            .json(&json!({
                "identifier": username,
                "password": test_password()
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        (id, token)
    }
}

#[allow(dead_code)]
pub fn session_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("token={}", token)).unwrap(),
    )
}

#[allow(dead_code)]
pub fn test_email(username: &str) -> String {
    format!("{}@example.com", username)
}

#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}

/// Migrated MySQL pool for store tests. `None` when `TEST_DATABASE_URL` is unset,
/// so the suite still runs without a database.
#[allow(dead_code)]
pub async fn test_db() -> Option<DbPool> {
    dotenvy::dotenv().ok();

    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("TEST_DATABASE_URL not set, skipping MySQL store test");
            return None;
        }
    };

    let db = init_db(&database_url, 5)
        .await
        .expect("Failed to connect to test database");
    Some(db)
}

/// Short unique suffix so store tests never collide on unique keys.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}
