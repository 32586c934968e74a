use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// openweather_api_key = "..."
/// bind_addr = "127.0.0.1:8000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather credential. Absent means weather lookups answer with a
    /// configuration error; the `OPENWEATHER_KEY` environment variable
    /// overrides this at startup.
    pub openweather_api_key: Option<String>,

    /// Address the web front door listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Where user profiles live. Defaults to the platform data directory.
    pub profiles_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            bind_addr: default_bind_addr(),
            profiles_path: None,
        }
    }
}

impl Config {
    /// Load config from the given path, or from the platform default path.
    /// A missing file is not an error; it yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config, creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Default path of the config file.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Resolved profile store path, explicit or platform default.
    pub fn profiles_path(&self) -> Result<PathBuf> {
        match &self.profiles_path {
            Some(p) => Ok(p.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("profiles.json")),
        }
    }

    /// Apply the `OPENWEATHER_KEY` environment override. Called once at
    /// startup so the rest of the system never touches ambient state.
    pub fn with_env_api_key(mut self, env_key: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|k| !k.is_empty()) {
            self.openweather_api_key = Some(key);
        }
        self
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "garden-planner", "garden-web")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}
