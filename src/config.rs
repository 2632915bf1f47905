//! Configuration and token persistence.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.huginn/config.toml` (user; optional)
//! 3. built-in defaults
//!
//! The API token lives apart from the config, in `~/.huginn/secrets.toml`,
//! which must not be readable by group or others. `HF_API_KEY` is used when
//! no token has been saved.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::providers::huggingface::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::{HuginnError, Result};

/// Environment variable consulted when no token is stored.
pub const TOKEN_ENV_VAR: &str = "HF_API_KEY";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
}

/// Inference endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the inference service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model ID to classify with.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Where reviews come from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewsConfig {
    /// TSV file with a `text` column. The built-in list is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `~/.huginn`, or `.huginn` when there is no home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".huginn"))
        .unwrap_or_else(|| PathBuf::from(".huginn"))
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(HuginnError::Configuration(format!(
                        "Config file not found: {path:?}"
                    )));
                }
                Self::load_from_file(path)
            }
            None => {
                let user_config = config_dir().join("config.toml");
                if user_config.exists() {
                    Self::load_from_file(&user_config)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;

        // Relative review paths are relative to the config file.
        if let (Some(reviews), Some(parent)) = (config.reviews.path.as_mut(), path.parent())
            && reviews.is_relative()
        {
            *reviews = parent.join(&*reviews);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Secrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    huggingface: Option<ApiKeySecret>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiKeySecret {
    api_key: String,
}

/// Persists the single API token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(config_dir().join("secrets.toml"))
    }
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, if any. Blank tokens count as absent.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        check_permissions(&self.path)?;
        let content = fs::read_to_string(&self.path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read secrets file {:?}: {e}", self.path))
        })?;
        let secrets: Secrets = toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse secrets file {:?}: {e}", self.path))
        })?;
        Ok(secrets
            .huggingface
            .map(|s| s.api_key)
            .filter(|k| !k.trim().is_empty()))
    }

    /// Stored token, falling back to [`TOKEN_ENV_VAR`].
    pub fn resolve(&self) -> Result<Option<String>> {
        Ok(self.load()?.or_else(|| {
            std::env::var(TOKEN_ENV_VAR)
                .ok()
                .filter(|k| !k.trim().is_empty())
        }))
    }

    /// Save a token, replacing any previous one. A blank token clears it.
    pub fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        let secrets = Secrets {
            huggingface: (!token.is_empty()).then(|| ApiKeySecret {
                api_key: token.to_string(),
            }),
        };
        let content = toml::to_string(&secrets).map_err(|e| {
            HuginnError::Configuration(format!("Failed to serialize secrets: {e}"))
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HuginnError::Configuration(format!("Failed to create {parent:?}: {e}"))
            })?;
        }
        write_private(&self.path, &content)?;
        debug!(path = ?self.path, "saved token");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.save("")
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let write = || -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // An existing file keeps its mode on open; tighten it explicitly.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(content.as_bytes())
    };
    write().map_err(|e| {
        HuginnError::Configuration(format!("Failed to write secrets file {path:?}: {e}"))
    })
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        HuginnError::Configuration(format!("Failed to write secrets file {path:?}: {e}"))
    })
}

/// Check that the secrets file has secure permissions (0600 or 0400).
#[cfg(unix)]
fn check_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| {
        HuginnError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
    })?;

    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(HuginnError::Configuration(format!(
            "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
            mode & 0o777
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
