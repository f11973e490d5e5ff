use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::dispatcher::Dispatcher;
use crate::error::SkillError;
use crate::types::Response;

/// Build the axum Router.
pub fn build(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/directive", post(handle_directive))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

async fn handle_directive(
    State(dispatcher): State<Dispatcher>,
    Json(event): Json<serde_json::Value>,
) -> Result<Json<Response>, SkillError> {
    let response = dispatcher.handle(&event).await?;
    Ok(Json(response))
}

async fn health(State(dispatcher): State<Dispatcher>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "publisher": dispatcher.publisher_name(),
    }))
}
