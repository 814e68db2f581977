use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const SUBJECT: &str = "Silent Notes | Verification Code";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Out-of-band delivery of verification codes.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_verification_code(
        &self,
        username: &str,
        email: &str,
        code: u32,
    ) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone)]
pub struct MailApiSettings {
    pub url: String,
    pub api_key: String,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

/// Sends verification mail through a transactional mail provider's HTTP API.
pub struct HttpMailNotifier {
    client: Client,
    settings: MailApiSettings,
}

impl HttpMailNotifier {
    pub fn new(settings: MailApiSettings) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self { client, settings })
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn send_verification_code(
        &self,
        username: &str,
        email: &str,
        code: u32,
    ) -> Result<(), NotifyError> {
        let payload = MailPayload {
            from: &self.settings.from,
            to: email,
            subject: SUBJECT,
            html: render_body(username, code),
        };

        let response = self
            .client
            .post(&self.settings.url)
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Mail provider returned {} for {}", status, email);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Verification code mailed to {}", email);
        Ok(())
    }
}

/// Writes codes to the log instead of mailing them. Local development only.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification_code(
        &self,
        username: &str,
        email: &str,
        code: u32,
    ) -> Result<(), NotifyError> {
        tracing::info!(username, email, code, "Verification code (mail delivery disabled)");
        Ok(())
    }
}

fn render_body(username: &str, code: u32) -> String {
    format!(
        "<p>Hi {},</p>\
         <p>Your verification code is <strong>{}</strong>.</p>\
         <p>It expires in 2 hours. If you did not sign up, ignore this email.</p>",
        username, code
    )
}
