use std::sync::Arc;

use axum::http::HeaderValue;
use silent_notes::config::{init_db, Config};
use silent_notes::modules::{auth::crud::AccountCrud, message::crud::MessageCrud};
use silent_notes::services::jwt::JwtService;
use silent_notes::services::notifier::{HttpMailNotifier, LogNotifier, Notifier};
use silent_notes::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_notes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let db = init_db(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Connected to MySQL");

    let notifier: Arc<dyn Notifier> = match config.mail.clone() {
        Some(settings) => Arc::new(HttpMailNotifier::new(settings)?),
        None => {
            tracing::warn!("MAIL_API_URL not set, verification codes will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState::new(
        Arc::new(AccountCrud::new(db.clone())),
        Arc::new(MessageCrud::new(db)),
        notifier,
        JwtService::new(config.jwt_secret.clone()),
        config.registration_order,
    );

    let allowed_origin = HeaderValue::from_str(&config.allowed_origin)?;
    let app = silent_notes::create_app(state, allowed_origin);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
