//! Context file library

use crate::error::ApiError;
use crate::handlers::history::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use ollagen_core::{ContextFileInfo, GenError};
use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    success: bool,
    filename: String,
    size: u64,
}

#[derive(Debug, Serialize)]
pub struct ContextListResponse {
    files: Vec<ContextFileInfo>,
}

#[derive(Debug, Deserialize)]
pub struct FilenameQuery {
    #[serde(default)]
    filename: String,
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            GenError::UploadRejected(format!("could not read upload: {}", e.body_text()))
        })?;

        let stored = state.library.save(&filename, &data).await?;
        return Ok(Json(UploadResponse {
            success: true,
            filename: stored.name,
            size: stored.size,
        }));
    }

    Err(GenError::MissingField(UPLOAD_FIELD).into())
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ContextListResponse>, ApiError> {
    let files = state.library.list().await?;
    Ok(Json(ContextListResponse { files }))
}

pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if query.filename.trim().is_empty() {
        return Err(GenError::MissingField("filename").into());
    }
    state.library.delete(&query.filename).await?;
    Ok(Json(SuccessResponse::ok()))
}
