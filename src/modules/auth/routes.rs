use axum::{
    middleware,
    routing::{post, put},
    Router,
};
use std::sync::Arc;

use super::controller;
use super::middleware::require_session;
use crate::AppState;

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/sign-out", post(controller::sign_out))
        .route(
            "/accept-messages",
            put(controller::set_accepting_messages).get(controller::get_accepting_messages),
        )
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/sign-up", post(controller::sign_up))
        .route("/sign-in", post(controller::sign_in))
        .route("/verify", put(controller::verify))
        .merge(protected)
}
