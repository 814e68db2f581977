use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::modules::auth::middleware::require_session;
use crate::AppState;

pub fn message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/get-messages", get(controller::get_messages))
        .route("/delete-message/{id}", delete(controller::delete_message))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/send-message", post(controller::send_message))
        .merge(protected)
}
