use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables, lost on exit.
    #[default]
    Memory,
    /// One JSON file per table under `data_dir`.
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), data_dir: default_data_dir() }
    }
}

fn default_data_dir() -> String { "data".to_string() }

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read and parse a config file. `Ok(None)` only when the file does not exist.
pub fn load_from_file(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map(Some).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Config file when present, otherwise defaults; environment overrides on top.
    /// An unreadable or malformed file is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?.unwrap_or_default();
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `SERVER_HOST`, `SERVER_PORT`, `STORAGE_BACKEND`, `DATA_DIR` and `LOG_FORMAT` win over the file.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        match std::env::var("STORAGE_BACKEND").map(|b| b.to_ascii_lowercase()).as_deref() {
            Ok("memory") => self.storage.backend = StorageBackend::Memory,
            Ok("file") => self.storage.backend = StorageBackend::File,
            _ => {}
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                self.log.format = LogFormat::Json;
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::File && self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is required for the file backend"));
        }
        Ok(())
    }
}
