use std::env;
use std::time::Duration;

use crate::modules::auth::verification::RegistrationOrder;
use crate::services::notifier::MailApiSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Environment configuration
/// Loaded once at startup and handed to the services that need it
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub allowed_origin: String,
    pub bind_addr: String,
    pub mail: Option<MailApiSettings>,
    pub registration_order: RegistrationOrder,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt_secret = required("JWT_SECRET")?;

        let allowed_origin =
            env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let mail = match env::var("MAIL_API_URL") {
            Ok(url) if !url.is_empty() => Some(MailApiSettings {
                url,
                api_key: required("MAIL_API_KEY")?,
                from: required("MAIL_FROM")?,
                timeout: Duration::from_secs(parsed("MAIL_TIMEOUT_SECS", 10)?),
            }),
            _ => None,
        };

        let registration_order = match env::var("REGISTRATION_ORDER") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "REGISTRATION_ORDER",
                value,
            })?,
            Err(_) => RegistrationOrder::default(),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            allowed_origin,
            bind_addr,
            mail,
            registration_order,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
