//! History archive download

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use ollagen_core::export::{archive_file_name, write_history_archive};
use tracing::info;

pub async fn export_history(State(state): State<AppState>) -> Result<Response, ApiError> {
    let entries = state.history.export_entries().await?;
    let archive = write_history_archive(&entries)?;
    let name = archive_file_name(chrono::Local::now().naive_local());

    info!("Exporting {} history records as {}", entries.len(), name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        archive,
    )
        .into_response())
}
