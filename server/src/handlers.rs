use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use smartnote_shared::{AnalyzeRequest, AnalyzeResponse};
use uuid::Uuid;

use crate::logic::analyze_image;
use crate::state::AppState;

pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(%request_id, error = %rejection.body_text(), "malformed analyze request");
            return (
                StatusCode::BAD_REQUEST,
                Json(AnalyzeResponse::failure(rejection.body_text())),
            );
        }
    };
    tracing::info!(%request_id, "received analysis request");
    let (status, response) = analyze_image(state.analyzer.as_ref(), request, request_id).await;
    (status, Json(response))
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.analyzer.check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
        Err(error) => {
            tracing::error!(%error, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": error.to_string() })),
            )
        }
    }
}
