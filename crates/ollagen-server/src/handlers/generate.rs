//! File generation

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ollagen_core::GenerationRequest;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreateFileResponse {
    success: bool,
    /// Stored artifact name; omitted when nothing was saved
    #[serde(skip_serializing_if = "String::is_empty")]
    filename: String,
    content: String,
    /// Human-readable, e.g. `1.25s`
    duration: String,
    duration_ms: u64,
}

pub async fn create_file(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<CreateFileResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = state.pipeline.create_file(&request).await?;

    Ok(Json(CreateFileResponse {
        success: true,
        filename: result.artifact_name.unwrap_or_default(),
        content: result.content,
        duration: format!("{:.2?}", result.duration),
        duration_ms: u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
    }))
}
