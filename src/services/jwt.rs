use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // account id
    pub iat: i64,           // issued at
    pub exp: i64,           // expiration time
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("session token expired")]
    Expired,

    #[error("session token could not be signed: {0}")]
    Signing(String),
}

/// Issues and validates the stateless session token handed to clients.
pub struct JwtService {
    secret: String,
    session_duration: Duration,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            session_duration: Duration::hours(24),
        }
    }

    pub fn session_duration_secs(&self) -> i64 {
        self.session_duration.num_seconds()
    }

    pub fn issue(&self, account_id: &str) -> Result<String, SessionError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Sign a token as if issued at `now`; it expires `now + 24h`.
    pub fn issue_at(&self, account_id: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        if self.secret.is_empty() {
            return Err(SessionError::Signing("signing secret is not configured".into()));
        }

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.session_duration).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SessionError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<String, SessionError> {
        self.validate_at(token, Utc::now())
    }

    /// Resolve the account id carried by `token`, judged at instant `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        // Expiry is compared below so that a token expiring exactly at `now` is rejected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        if data.claims.exp <= now.timestamp() {
            return Err(SessionError::Expired);
        }

        Ok(data.claims.sub)
    }
}
