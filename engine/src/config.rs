use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub insecure: bool,
}

fn default_base_url() -> String { common::DEFAULT_BASE_URL.to_string() }
fn default_timeout() -> u64 { 30 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            username: None,
            password: None,
            timeout_secs: default_timeout(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub output: Option<PathBuf>,
    /// Receives the per-item batch outcome lines.
    pub audit_output: Option<PathBuf>,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: None,
            audit_output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_exclude_launch_type")]
    pub exclude_launch_type: String,
}

fn default_order_by() -> String { "-finished".to_string() }
fn default_page_size() -> u32 { 20 }
fn default_exclude_launch_type() -> String { "sync".to_string() }

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            order_by: default_order_by(),
            page_size: default_page_size(),
            exclude_launch_type: default_exclude_launch_type(),
        }
    }
}

impl ListConfig {
    pub fn params(&self) -> common::ListParams {
        common::ListParams::job_list(&self.order_by, &self.exclude_launch_type, self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub list: ListConfig,
    /// File the values were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !matches!(format, "yaml" | "yml" | "toml") {
            bail!("jobdeck config {:?} must be .yaml, .yml or .toml", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read jobdeck config {:?}", path))?;
        let mut config: Config = if format == "toml" {
            toml::from_str(&content).with_context(|| format!("Invalid TOML in jobdeck config {:?}", path))?
        } else {
            serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in jobdeck config {:?}", path))?
        };
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn merge(&mut self, other: Config) {
        if other.source.is_some() {
            self.source = other.source;
        }
        self.api.base_url = other.api.base_url;
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
        if other.api.username.is_some() {
            self.api.username = other.api.username;
            self.api.password = other.api.password;
        }
        self.api.timeout_secs = other.api.timeout_secs;
        self.api.insecure = other.api.insecure;

        self.logging.level = other.logging.level;
        if other.logging.output.is_some() {
            self.logging.output = other.logging.output;
        }
        if other.logging.audit_output.is_some() {
            self.logging.audit_output = other.logging.audit_output;
        }

        self.list = other.list;
    }

    /// Explicit path, then `JOBDECK_CONFIG`, then the user and system files.
    /// `JOBDECK_URL`, `JOBDECK_TOKEN` and `JOBDECK_LOG` win over all of them.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = explicit {
            config.merge(Self::from_file(path)?);
        } else if let Ok(path) = std::env::var("JOBDECK_CONFIG") {
            config.merge(Self::from_file(Path::new(&path))?);
        } else {
            let candidates = [
                PathBuf::from(common::DEFAULT_CONFIG_PATH),
                expand_home(common::USER_CONFIG_PATH),
            ];
            if let Some(path) = candidates.iter().rev().find(|p| p.exists()) {
                config.merge(Self::from_file(path)?);
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("JOBDECK_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = var("JOBDECK_TOKEN") {
            self.api.token = Some(token);
        }
        if let Some(output) = var("JOBDECK_LOG") {
            self.logging.output = Some(PathBuf::from(output));
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}
