use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use smartnote_shared::{AnalyzeRequest, AnalyzeResponse};
use uuid::Uuid;

use crate::analyzer::Analyzer;

/// Drops a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(image_data: &str) -> &str {
    match image_data.split_once("base64,") {
        Some((_, payload)) => payload,
        None => image_data,
    }
}

pub fn validate_image(image_data: &str) -> Result<&str, String> {
    let payload = strip_data_url(image_data.trim()).trim();
    if payload.is_empty() {
        return Err("empty image payload".to_string());
    }
    STANDARD
        .decode(payload)
        .map_err(|error| error.to_string())?;
    Ok(payload)
}

pub async fn analyze_image(
    analyzer: &dyn Analyzer,
    request: AnalyzeRequest,
    request_id: Uuid,
) -> (StatusCode, AnalyzeResponse) {
    let payload = match validate_image(&request.image_data) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%request_id, %error, "rejecting image");
            return (
                StatusCode::BAD_REQUEST,
                AnalyzeResponse::failure(format!("Invalid image data: {error}")),
            );
        }
    };
    tracing::info!(%request_id, bytes = payload.len(), "sending image to model");
    match analyzer.analyze(payload).await {
        Ok(text) => {
            tracing::info!(%request_id, chars = text.len(), "analysis complete");
            (StatusCode::OK, AnalyzeResponse::success(text))
        }
        Err(error) => {
            tracing::error!(%request_id, %error, "analysis failed");
            (
                StatusCode::OK,
                AnalyzeResponse::failure(format!("Analysis failed: {error}")),
            )
        }
    }
}
