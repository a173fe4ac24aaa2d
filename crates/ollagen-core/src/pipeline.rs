//! The create-file pipeline
//!
//! `Validating → AssemblingContext → CallingBackend → [PersistingArtifact]
//! → [RecordingHistory] → Succeeded | Failed`
//!
//! The bracketed stages only run when the request asks for persistence.
//! Every stage failure is terminal except history recording, which is
//! logged and swallowed once the artifact is on disk.

use crate::context::ContextAssembler;
use crate::error::{GenError, Result};
use crate::path_guard::PathGuard;
use crate::ports::{ArtifactStore, HistoryStore, ModelBackend};
use ollagen_types::{GenerationRequest, GenerationResult, HistoryRecord};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Pipeline stage, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    AssemblingContext,
    CallingBackend,
    PersistingArtifact,
    RecordingHistory,
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::AssemblingContext => "assembling_context",
            Stage::CallingBackend => "calling_backend",
            Stage::PersistingArtifact => "persisting_artifact",
            Stage::RecordingHistory => "recording_history",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct GenerationPipeline {
    backend: Arc<dyn ModelBackend>,
    assembler: ContextAssembler,
    artifacts: Arc<dyn ArtifactStore>,
    history: Arc<dyn HistoryStore>,
    timeout: Duration,
}

impl GenerationPipeline {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        assembler: ContextAssembler,
        artifacts: Arc<dyn ArtifactStore>,
        history: Arc<dyn HistoryStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            assembler,
            artifacts,
            history,
            timeout,
        }
    }

    pub fn backend(&self) -> &Arc<dyn ModelBackend> {
        &self.backend
    }

    /// Run one generation request to completion
    pub async fn create_file(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let mut stage = Stage::Validating;
        match self.run(request, &mut stage).await {
            Ok(result) => {
                info!(
                    "Generation {} in {:?} (artifact: {})",
                    Stage::Succeeded,
                    result.duration,
                    result.artifact_name.as_deref().unwrap_or("none")
                );
                Ok(result)
            }
            Err(e) => {
                warn!("Generation {} while {}: {}", Stage::Failed, stage, e);
                Err(e)
            }
        }
    }

    async fn run(&self, request: &GenerationRequest, stage: &mut Stage) -> Result<GenerationResult> {
        validate(request)?;

        *stage = Stage::AssemblingContext;
        let prompt = self
            .assembler
            .assemble(&request.prompt, &request.context, &request.context_files)
            .await?;

        *stage = Stage::CallingBackend;
        debug!("Calling backend with model {}", request.model);
        let started = Instant::now();
        let content = self
            .backend
            .generate(&request.model, &prompt, &request.options, self.timeout)
            .await?;
        let duration = started.elapsed();

        if !request.persist {
            return Ok(GenerationResult {
                content,
                artifact_name: None,
                duration,
            });
        }

        *stage = Stage::PersistingArtifact;
        let artifact_name = self.artifacts.save(&request.filename, &content).await?;

        *stage = Stage::RecordingHistory;
        let record = HistoryRecord::new(request, artifact_name.clone(), content.clone(), duration);
        if let Err(e) = self.history.append(&record).await {
            warn!("Artifact {} written but history was not: {}", artifact_name, e);
        }

        Ok(GenerationResult {
            content,
            artifact_name: Some(artifact_name),
            duration,
        })
    }

    pub async fn list_history(&self) -> Result<Vec<HistoryRecord>> {
        self.history.list().await
    }

    pub async fn load_history(&self, id: &str) -> Result<HistoryRecord> {
        self.history.load(id).await
    }

    pub async fn delete_history(&self, id: &str) -> Result<()> {
        self.history.delete(id).await
    }
}

fn validate(request: &GenerationRequest) -> Result<()> {
    if request.prompt.trim().is_empty() {
        return Err(GenError::MissingField("prompt"));
    }
    if request.model.trim().is_empty() {
        return Err(GenError::MissingField("model"));
    }
    if request.persist {
        if request.filename.trim().is_empty() {
            return Err(GenError::MissingField("filename"));
        }
        PathGuard::base_name(&request.filename)?;
    }
    Ok(())
}
