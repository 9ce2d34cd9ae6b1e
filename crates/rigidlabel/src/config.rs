#![forbid(unsafe_code)]

//! Application configuration.
//!
//! Every tunable lives in one [`AppConfig`] loaded from TOML (or JSON) at
//! startup. Every field has a default, so a partial file or no file at all
//! still yields a working configuration.
//!
//! # Loading
//!
//! ```toml
//! # rigidlabel.toml
//! [backend]
//! base_url = "http://127.0.0.1:8000"
//!
//! [ui]
//! origin_mode = "top-left"
//!
//! [transform]
//! default_mode = "affine"
//! min_points_required = 4
//! ```
//!
//! ```rust,ignore
//! let config = AppConfig::from_toml_file("rigidlabel.toml")?;
//! let config = AppConfig::load_or_default(Some(path))?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use rigidlabel_client::HttpConfig;
use rigidlabel_client::wire::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use rigidlabel_core::{OriginMode, TransformMode};
use rigidlabel_runtime::{HistoryConfig, LabelerSettings};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rigidlabel.toml";

// ---------------------------------------------------------------------------
// Top-level AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub paths: PathsConfig,
    pub ui: UiConfig,
    pub transform: TransformConfig,
    pub history: HistorySection,
}

impl AppConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load `path` (or [`DEFAULT_CONFIG_FILE`]) and validate it.
    ///
    /// A missing file is not an error: the defaults are used and a warning
    /// is logged. A file that exists but does not parse or validate is.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if !path.exists() {
            tracing::warn!(
                target: "rigidlabel.config",
                path = %path.display(),
                "config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_file(&path)?
        };

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        tracing::debug!(target: "rigidlabel.config", path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check every parameter is usable.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!(
                "backend.base_url must start with http:// or https://, got {:?}",
                self.backend.base_url
            ));
        }
        if self.backend.connect_timeout_ms == 0 {
            errors.push("backend.connect_timeout_ms must be > 0".into());
        }
        if self.backend.request_timeout_ms == 0 {
            errors.push("backend.request_timeout_ms must be > 0".into());
        }

        if self.ui.language.trim().is_empty() {
            errors.push("ui.language must not be empty".into());
        }
        if !matches!(self.ui.theme.as_str(), "light" | "dark") {
            errors.push(format!(
                "ui.theme must be \"light\" or \"dark\", got {:?}",
                self.ui.theme
            ));
        }

        if self.transform.min_points_required == Some(0) {
            errors.push("transform.min_points_required must be > 0".into());
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.transform.checkerboard_size) {
            errors.push(format!(
                "transform.checkerboard_size must be in {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                self.transform.checkerboard_size
            ));
        }

        if self.history.max_depth == 0 {
            errors.push("history.max_depth must be > 0".into());
        }

        errors
    }

    /// Connection settings for the transform service.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.backend.base_url.clone(),
            connect_timeout: Duration::from_millis(self.backend.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.backend.request_timeout_ms),
            retries: self.backend.retries,
        }
    }

    /// Startup settings for the labeling controller.
    #[must_use]
    pub fn labeler_settings(&self) -> LabelerSettings {
        LabelerSettings {
            origin_mode: self.ui.origin_mode,
            transform_mode: self.transform.default_mode,
            min_points_floor: self.transform.min_points_required,
            checkerboard_size: self.transform.checkerboard_size,
            history: HistoryConfig::new(self.history.max_depth, self.history.max_bytes),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Extra attempts for idempotent requests.
    pub retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: rigidlabel_client::DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 10_000,
            retries: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub images_root: PathBuf,
    pub labels_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_root: PathBuf::from("data/images"),
            labels_root: PathBuf::from("data/labels"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: String,
    pub theme: String,
    pub link_views_by_default: bool,
    pub origin_mode: OriginMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "zh-CN".to_string(),
            theme: "light".to_string(),
            link_views_by_default: true,
            origin_mode: OriginMode::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub default_mode: TransformMode,
    /// Raises the per-mode minimum of complete pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_points_required: Option<usize>,
    pub checkerboard_size: u32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_mode: TransformMode::Rigid,
            min_points_required: None,
            checkerboard_size: DEFAULT_BOARD_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub max_depth: usize,
    /// Byte budget for the row-level history, 0 for none.
    pub max_bytes: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        let defaults = HistoryConfig::default();
        Self {
            max_depth: defaults.max_depth,
            max_bytes: defaults.max_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
