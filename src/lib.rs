pub mod config;
pub mod modules;
pub mod services;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, map_response_body::MapResponseBodyLayer,
    trace::TraceLayer,
};

use modules::auth::{
    auth_routes,
    interface::AccountStore,
    session::SessionService,
    verification::{RegistrationOrder, VerificationService},
};
use modules::message::{interface::MessageStore, message_routes, service::MessageService};
use modules::response::ApiResponse;
use services::{jwt::JwtService, notifier::Notifier};

pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub jwt_service: Arc<JwtService>,
    pub verification: Arc<VerificationService>,
    pub sessions: Arc<SessionService>,
    pub messages: Arc<MessageService>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        messages: Arc<dyn MessageStore>,
        notifier: Arc<dyn Notifier>,
        jwt_service: JwtService,
        registration_order: RegistrationOrder,
    ) -> Self {
        let jwt_service = Arc::new(jwt_service);
        let verification = Arc::new(VerificationService::new(
            accounts.clone(),
            notifier,
            registration_order,
        ));
        let sessions = Arc::new(SessionService::new(
            accounts.clone(),
            verification.clone(),
            jwt_service.clone(),
        ));
        let messages = Arc::new(MessageService::new(accounts.clone(), messages));

        Self {
            accounts,
            jwt_service,
            verification,
            sessions,
            messages,
        }
    }
}

pub fn create_app(state: AppState, allowed_origin: HeaderValue) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE]);

    let api = auth_routes(state.clone()).merge(message_routes(state.clone()));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(1024 * 100)), // 100KB max body
        )
        .with_state(state)
}

async fn root() -> &'static str {
    "Silent Notes API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: &'static str,
}

async fn health_check(State(state): State<Arc<AppState>>) -> ApiResponse<HealthResponse> {
    match state.accounts.ping().await {
        Ok(()) => ApiResponse::success(
            StatusCode::OK,
            "It's healthy",
            HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
                store: "up",
            },
        ),
        Err(e) => {
            tracing::error!("Store ping failed: {}", e);
            ApiResponse {
                status_code: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                success: false,
                message: "store unreachable".to_string(),
                data: Some(HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    store: "down",
                }),
                error: Some("store unreachable".to_string()),
            }
        }
    }
}
