//! Model listing

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use ollagen_core::ModelInfo;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    models: Vec<ModelInfo>,
    default_model: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    let models = state.pipeline.backend().list_models().await?;

    Ok(Json(ModelListResponse {
        models,
        default_model: state.config.default_model.clone(),
    }))
}
