//! Drawbot configuration
//!
//! Read from `<config_dir>/config.toml` by default. A `.json` path is read
//! as JSON. Every field has a default, so a partial file is fine and a
//! missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::MAX_DIMENSION;
use crate::errors::{DrawError, Result};

/// Which collaborator turns prompts into commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// Built-in keyword interpreter
    #[default]
    Local,
    /// HTTP drawing service
    Remote,
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorKind::Local => f.write_str("local"),
            GeneratorKind::Remote => f.write_str("remote"),
        }
    }
}

/// Remote drawing service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Sent as `userId` with every generation request
    pub user_id: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:7208/api".to_string(),
            timeout_seconds: 30,
            user_id: 2,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Endpoint that turns a prompt into commands
    pub fn generate_url(&self) -> String {
        format!("{}/ai/generate-drawing", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DrawError::config(format!(
                "remote.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(DrawError::config("remote.timeout_seconds must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawbotConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Pause between commands during animated playback
    pub animation_delay_ms: u64,
    pub generator: GeneratorKind,
    /// Use the local interpreter when the remote generator fails
    pub fallback_to_local: bool,
    /// Drawing store file; `<data_dir>/drawings.json` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Kept last so it serializes as a trailing `[remote]` table
    pub remote: RemoteConfig,
}

impl Default for DrawbotConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            animation_delay_ms: 200,
            generator: GeneratorKind::Local,
            fallback_to_local: false,
            store_path: None,
            remote: RemoteConfig::default(),
        }
    }
}

impl DrawbotConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "drawbot", "drawbot")
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Where drawings are stored
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .or_else(|| Self::data_dir().map(|d| d.join("drawings.json")))
            .unwrap_or_else(|| PathBuf::from("drawings.json"))
    }

    pub fn animation_delay(&self) -> Duration {
        Duration::from_millis(self.animation_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(DrawError::config("canvas size must be positive"));
        }
        if self.canvas_width > MAX_DIMENSION || self.canvas_height > MAX_DIMENSION {
            return Err(DrawError::config(format!(
                "canvas size must be at most {MAX_DIMENSION}x{MAX_DIMENSION}, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.generator == GeneratorKind::Remote {
            self.remote.validate()?;
        }
        Ok(())
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DrawError::config(format!("Failed to serialize config: {e}")))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Load from the default location
pub fn load_config() -> Result<DrawbotConfig> {
    let path = DrawbotConfig::config_path()
        .ok_or_else(|| DrawError::config("Could not determine config path"))?;
    load_config_from(&path)
}

/// Load from `path`; defaults when the file does not exist
pub fn load_config_from(path: &Path) -> Result<DrawbotConfig> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(DrawbotConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| DrawError::config(format!("Failed to read {}: {e}", path.display())))?;

    let config: DrawbotConfig = if is_json(path) {
        serde_json::from_str(&content)
            .map_err(|e| DrawError::config(format!("Invalid JSON config: {e}")))?
    } else {
        toml::from_str(&content)
            .map_err(|e| DrawError::config(format!("Invalid TOML config: {e}")))?
    };

    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write to `path`, creating parent directories
pub fn save_config(config: &DrawbotConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DrawError::config(format!("Failed to create config dir: {e}")))?;
    }

    let content = if is_json(path) {
        serde_json::to_string_pretty(config)
            .map_err(|e| DrawError::config(format!("Failed to serialize config: {e}")))?
    } else {
        config.to_toml()?
    };

    fs::write(path, content)
        .map_err(|e| DrawError::config(format!("Failed to write config: {e}")))?;
    Ok(())
}
