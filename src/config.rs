use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LISTEN_PORT: u16 = 11111;
pub const LOCALHOST: &str = "127.0.0.1";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const SETTINGS_FILE_NAME: &str = "settings.bin";
pub const LOGS_DIR_NAME: &str = "logs";
pub const LOG_FILE_NAME: &str = "logs.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub server: ServerConfig,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: LOCALHOST.to_string(),
            port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    #[error("config yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Files the relay keeps next to its executable directory (`<working dir>/bin`).
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub bin_dir: PathBuf,
    pub config_file: PathBuf,
    pub settings_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl Paths {
    pub fn from_working_dir(dir: &Path) -> Self {
        let bin_dir = dir.join("bin");
        Self {
            config_file: bin_dir.join(CONFIG_FILE_NAME),
            settings_file: bin_dir.join(SETTINGS_FILE_NAME),
            logs_dir: bin_dir.join(LOGS_DIR_NAME),
            bin_dir,
        }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn resolve_config_path(paths: &Paths) -> PathBuf {
    env::var("PRINT2FAX_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(|p| expand_tilde(&p))
        .unwrap_or_else(|| paths.config_file.clone())
}

/// Writes a default config file if none exists yet.
pub fn create_config_if_missing(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_yaml::to_string(&Config::default())?;
    fs::write(path, raw)?;
    Ok(())
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(&raw)?)
}

pub fn load_config(paths: &Paths) -> Result<Config, ConfigError> {
    let config_path = resolve_config_path(paths);
    create_config_if_missing(&config_path)?;
    let mut cfg = read_config(&config_path)?;

    // Override from environment
    if let Ok(host) = env::var("PRINT2FAX_HOST") {
        if !host.trim().is_empty() {
            cfg.server.host = host;
        }
    }

    if let Ok(port) = env::var("PRINT2FAX_PORT") {
        if let Ok(port) = port.trim().parse::<u16>() {
            cfg.server.port = port;
        }
    }

    Ok(cfg)
}
