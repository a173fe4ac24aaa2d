//! Model backend port

use crate::Result;
use async_trait::async_trait;
use ollagen_types::{ModelInfo, OptionMap};
use std::time::Duration;

/// A text-generation service.
///
/// Each call is a single attempt. Implementations never retry.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Generate text for `prompt`, bounded by `timeout`
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &OptionMap,
        timeout: Duration,
    ) -> Result<String>;

    /// Models installed on the backend
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Reachable and answering successfully
    async fn is_healthy(&self) -> bool;
}
