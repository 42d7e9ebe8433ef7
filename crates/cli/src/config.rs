use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use billed_employee::UploadPolicy;

/// Configuration file looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "billed.toml";

/// Endpoint used when neither the flag nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5678";

/// Top-level configuration for the CLI, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct BilledConfig {
    /// Remote store connection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Receipt upload rules.
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the bills API.
    pub endpoint: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request.
    pub jwt: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            jwt: None,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct UploadsConfig {
    /// Receipt extensions accepted before upload.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_allowed_extensions() -> Vec<String> {
    UploadPolicy::default().allowed_extensions().to_vec()
}

impl BilledConfig {
    /// Parse the file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Load `path` when given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(&self.uploads.allowed_extensions)
    }
}
