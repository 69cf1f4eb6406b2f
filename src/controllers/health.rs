use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::domain::tts::TtsService;

/// Labels meaning a provider cannot serve requests
const UNAVAILABLE: &[&str] = &["failed", "not_configured"];

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Report provider readiness without triggering credential resolution
pub async fn health_ready(State(tts_service): State<Arc<TtsService>>) -> impl IntoResponse {
    let statuses = tts_service.provider_status();

    let any_available = statuses
        .iter()
        .any(|(_, status)| !UNAVAILABLE.contains(status));

    let providers: Map<String, Value> = statuses
        .into_iter()
        .map(|(provider, status)| (provider.as_str().to_string(), json!(status)))
        .collect();

    if any_available {
        (
            StatusCode::OK,
            Json(json!({ "status": "ready", "providers": providers })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "providers": providers })),
        )
    }
}
