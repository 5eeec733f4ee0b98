/*
[INPUT]:  YAML configuration file
[OUTPUT]: API, viewer and transaction watch settings
[POS]:    Configuration layer - runtime setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use linguo_adapter::{Address, ClientConfig};
use serde::{Deserialize, Serialize};

use crate::domain::Skill;
use crate::workflow::TxWatchConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinguoConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Viewer account used to resolve the party role
    #[serde(default)]
    pub account: Option<Address>,
    /// Translator skills used by listing tiebreakers
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub transactions: TransactionsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Transaction mining watch settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionsConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_tx_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_confirmations")]
    pub confirmations: u32,
}

impl Default for TransactionsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_tx_timeout_secs(),
            confirmations: default_confirmations(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.linguo.kleros.io".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_tx_timeout_secs() -> u64 {
    600
}

fn default_confirmations() -> u32 {
    1
}

impl LinguoConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// `~/.config/linguo/config.yaml` on Linux, platform equivalent elsewhere.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("linguo").join("config.yaml"))
    }

    /// Load `path`, or the default path when it exists, or built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
        }
    }

    pub fn tx_watch_config(&self) -> TxWatchConfig {
        TxWatchConfig {
            poll_interval: Duration::from_millis(self.transactions.poll_interval_ms),
            timeout: Duration::from_secs(self.transactions.timeout_secs),
            confirmations: self.transactions.confirmations,
        }
    }
}
