//! Gateway configuration
//!
//! Built once at startup and handed to each component at construction.
//! Values come from built-in defaults, an optional `ollagen.{toml,yaml,json}`
//! file in the working directory, and environment variables, in that order.

use crate::error::{GenError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default model backend URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:11434";

/// Default model for generation
pub const DEFAULT_MODEL: &str = "llama2";

/// Default bind address for the gateway
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Upper bound on a single uploaded context file (10MB)
pub const DEFAULT_MAX_CONTEXT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Context file extensions accepted on upload
pub const DEFAULT_CONTEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".js", ".py", ".go", ".json", ".xml", ".html", ".css", ".sql", ".yml",
    ".yaml", ".sh", ".rs", ".java", ".cpp", ".c", ".h",
];

/// Immutable gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the model backend
    pub backend_url: String,
    /// Where generated artifacts are written
    pub output_dir: PathBuf,
    /// One JSON file per history record
    pub history_dir: PathBuf,
    /// Uploaded context files
    pub context_dir: PathBuf,
    /// Model suggested to clients
    pub default_model: String,
    /// Upper bound on one backend generation call
    pub request_timeout: Duration,
    /// Upper bound on establishing the backend connection
    pub connect_timeout: Duration,
    /// Ask the backend for a streamed response
    pub stream: bool,
    pub bind_address: String,
    /// Static frontend files, if any
    pub static_dir: Option<PathBuf>,
    pub max_context_file_size: u64,
    /// Lowercase extensions including the dot, e.g. ".md"
    pub allowed_context_extensions: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            output_dir: PathBuf::from("./generated_files"),
            history_dir: PathBuf::from("./prompt_history"),
            context_dir: PathBuf::from("./context_files"),
            default_model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            stream: true,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            static_dir: None,
            max_context_file_size: DEFAULT_MAX_CONTEXT_FILE_SIZE,
            allowed_context_extensions: DEFAULT_CONTEXT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Settings as they appear in files and the environment
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    ollama_url: String,
    output_dir: String,
    history_dir: String,
    context_dir: String,
    default_model: String,
    request_timeout_secs: u64,
    connect_timeout_secs: u64,
    stream: bool,
    bind_address: String,
    static_dir: Option<String>,
    max_context_file_size: u64,
    /// Comma-separated
    allowed_context_extensions: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        let defaults = GatewayConfig::default();
        Self {
            ollama_url: defaults.backend_url,
            output_dir: defaults.output_dir.to_string_lossy().to_string(),
            history_dir: defaults.history_dir.to_string_lossy().to_string(),
            context_dir: defaults.context_dir.to_string_lossy().to_string(),
            default_model: defaults.default_model,
            request_timeout_secs: defaults.request_timeout.as_secs(),
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            stream: defaults.stream,
            bind_address: defaults.bind_address,
            static_dir: None,
            max_context_file_size: defaults.max_context_file_size,
            allowed_context_extensions: DEFAULT_CONTEXT_EXTENSIONS.join(","),
        }
    }
}

impl GatewayConfig {
    /// Load from `ollagen.*` (optional) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(config::Environment::default())
    }

    /// Load with an explicit environment source
    pub fn load_with(env: config::Environment) -> Result<Self> {
        info!("Loading configuration...");

        let settings = config::Config::builder()
            .add_source(config::File::with_name("ollagen").required(false))
            .add_source(env)
            .build()?;

        let raw: RawConfig = settings.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        if raw.ollama_url.trim().is_empty() {
            return Err(GenError::Config("ollama_url must not be empty".to_string()));
        }
        if raw.request_timeout_secs == 0 {
            return Err(GenError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let allowed_context_extensions = raw
            .allowed_context_extensions
            .split(',')
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        let config = Self {
            backend_url: raw.ollama_url.trim_end_matches('/').to_string(),
            output_dir: PathBuf::from(raw.output_dir),
            history_dir: PathBuf::from(raw.history_dir),
            context_dir: PathBuf::from(raw.context_dir),
            default_model: raw.default_model,
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            connect_timeout: Duration::from_secs(raw.connect_timeout_secs.max(1)),
            stream: raw.stream,
            bind_address: raw.bind_address,
            static_dir: raw
                .static_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            max_context_file_size: raw.max_context_file_size,
            allowed_context_extensions,
        };

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Place the output, history and context directories under `root`
    pub fn with_root(mut self, root: &Path) -> Self {
        self.output_dir = root.join("generated_files");
        self.history_dir = root.join("prompt_history");
        self.context_dir = root.join("context_files");
        self
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Create the output, history and context directories if missing
    pub async fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.history_dir, &self.context_dir] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                GenError::Config(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            debug!("Directory ready: {}", dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::load_with(env(&[])).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        assert!(config.stream);
        assert!(config.static_dir.is_none());
        assert!(config
            .allowed_context_extensions
            .contains(&".rs".to_string()));
    }

    #[test]
    fn test_environment_overrides() {
        let config = GatewayConfig::load_with(env(&[
            ("OLLAMA_URL", "http://gpu-box:11434/"),
            ("OUTPUT_DIR", "/tmp/out"),
            ("DEFAULT_MODEL", "codellama"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("STREAM", "false"),
            ("STATIC_DIR", "./web"),
            ("ALLOWED_CONTEXT_EXTENSIONS", "md, TXT,.toml"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "http://gpu-box:11434");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.default_model, "codellama");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.stream);
        assert_eq!(config.static_dir, Some(PathBuf::from("./web")));
        assert_eq!(
            config.allowed_context_extensions,
            vec![".md", ".txt", ".toml"]
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = GatewayConfig::load_with(env(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[tokio::test]
    async fn test_ensure_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig::default().with_root(temp_dir.path());

        config.ensure_directories().await.unwrap();
        assert!(config.output_dir.is_dir());
        assert!(config.history_dir.is_dir());
        assert!(config.context_dir.is_dir());
    }
}
