//! Shared state and HTTP routing

use crate::handlers;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use ollagen_core::{
    ContextAssembler, ContextLibrary, FsArtifactStore, FsHistoryStore, GatewayConfig,
    GenerationPipeline, ModelBackend, OllamaBackend,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Multipart framing allowance on top of the context file size limit
const UPLOAD_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub pipeline: Arc<GenerationPipeline>,
    pub history: Arc<FsHistoryStore>,
    pub library: Arc<ContextLibrary>,
}

impl AppState {
    pub fn new(config: GatewayConfig, backend: Arc<dyn ModelBackend>) -> Self {
        let history = Arc::new(FsHistoryStore::new(config.history_dir.clone()));
        let pipeline = GenerationPipeline::new(
            backend,
            ContextAssembler::from_dir(config.context_dir.clone()),
            Arc::new(FsArtifactStore::new(config.output_dir.clone())),
            history.clone(),
            config.request_timeout,
        );

        Self {
            library: Arc::new(ContextLibrary::from_config(&config)),
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            history,
        }
    }

    /// State backed by the Ollama server named in `config`
    pub fn from_config(config: GatewayConfig) -> ollagen_core::Result<Self> {
        let backend = OllamaBackend::from_config(&config)?;
        info!("Model backend: {}", backend.base_url());
        Ok(Self::new(config, Arc::new(backend)))
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.config.max_context_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(UPLOAD_OVERHEAD);

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes(upload_limit));

    if let Some(static_dir) = &state.config.static_dir {
        info!("Static files directory: {}", static_dir.display());
        let index = ServeFile::new(static_dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/create-file", post(handlers::generate::create_file))
        .route("/models", get(handlers::models::list))
        .route("/health", get(handlers::health))
        .route("/history", get(handlers::history::list))
        .route("/history/load", get(handlers::history::load))
        .route("/history/delete", delete(handlers::history::delete))
        .route(
            "/upload-context",
            post(handlers::context::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/context-files", get(handlers::context::list))
        .route("/delete-context", delete(handlers::context::delete))
        .route("/export-history", get(handlers::export::export_history))
}
