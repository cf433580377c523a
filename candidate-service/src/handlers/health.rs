use crate::services::render_metrics;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::collections::HashMap;

/// `GET /`: there is nothing to serve at the root.
pub async fn invalid_request() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "invalid request" })),
    )
}

/// `GET /gtg`: liveness probe. Never touches the store.
///
/// Presence of `details` is what matters; `?details` and `?details=0` both
/// ask for the detailed body.
pub async fn gtg(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if params.contains_key("details") {
        return (
            StatusCode::OK,
            Json(json!({
                "connected": "true",
                "instance-id": state.instance_id.as_str(),
            })),
        )
            .into_response();
    }

    StatusCode::OK.into_response()
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}
