use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ServiceError};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub transcriber: TranscriberConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Largest accepted upload body, in MiB
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the subtitle generator (e.g., auto_subtitle)
    pub binary_path: String,
    /// Arguments placed before the video path, e.g. ["-m", "auto_subtitle"] for python3
    pub binary_args: Vec<String>,
    /// Whisper model the tool should load
    pub model: String,
    /// Compute device selector. Kept for deployment parity, not passed to the tool.
    pub device: String,
    /// Suffix given to staged uploads
    pub video_suffix: String,
    /// Root for staged uploads and working directories; OS temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; console only when unset
    pub directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 2048,
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "auto_subtitle".to_string(),
            binary_args: Vec::new(),
            model: "base".to_string(),
            device: "cpu".to_string(),
            video_suffix: ".mp4".to_string(),
            scratch_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl TranscriberConfig {
    /// Directory new scratch files and directories are created in.
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Like [`scratch_root`](Self::scratch_root), creating the directory if needed.
    pub fn ensure_scratch_root(&self) -> Result<PathBuf> {
        let root = self.scratch_root();
        std::fs::create_dir_all(&root)?;
        Ok(root)
    }
}

impl Config {
    /// Config file to read: the explicit path, else `config.toml` in the
    /// working directory if it exists.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
        }
    }

    /// Build the process-wide configuration: defaults, then the config file
    /// at `path` if any, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ServiceError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `WHISPER_*` and `SUBTITLE_SERVICE_*` overrides using `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("WHISPER_MODEL") {
            self.transcriber.model = model;
        }
        if let Some(device) = lookup("WHISPER_DEVICE") {
            self.transcriber.device = device;
        }
        if let Some(host) = lookup("SUBTITLE_SERVICE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SUBTITLE_SERVICE_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ServiceError::Config(format!("Invalid SUBTITLE_SERVICE_PORT '{}'", port))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.transcriber.binary_path.trim().is_empty() {
            return Err(ServiceError::Config("transcriber.binary_path must not be empty".to_string()));
        }
        if self.transcriber.model.trim().is_empty() {
            return Err(ServiceError::Config("transcriber.model must not be empty".to_string()));
        }
        if !self.transcriber.video_suffix.starts_with('.') {
            return Err(ServiceError::Config(format!(
                "transcriber.video_suffix must start with '.', got '{}'",
                self.transcriber.video_suffix
            )));
        }
        if self.server.max_upload_mb == 0 {
            return Err(ServiceError::Config("server.max_upload_mb must be positive".to_string()));
        }
        Ok(())
    }
}
