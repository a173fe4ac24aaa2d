//! Prompt history

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use ollagen_core::{GenError, HistoryRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    id: String,
}

impl IdQuery {
    fn id(&self) -> Result<&str, ApiError> {
        if self.id.trim().is_empty() {
            return Err(GenError::MissingField("id").into());
        }
        Ok(&self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    history: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItemResponse {
    success: bool,
    item: HistoryRecord,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<HistoryListResponse>, ApiError> {
    let history = state.pipeline.list_history().await?;
    Ok(Json(HistoryListResponse { history }))
}

pub async fn load(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<HistoryItemResponse>, ApiError> {
    let item = state.pipeline.load_history(query.id()?).await?;
    Ok(Json(HistoryItemResponse {
        success: true,
        item,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.pipeline.delete_history(query.id()?).await?;
    Ok(Json(SuccessResponse::ok()))
}
