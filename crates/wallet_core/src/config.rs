//! Process configuration - an explicit struct constructed once at startup
//! and passed by reference into the store and transport. No globals.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const CONFIG_FILE_PATH: &str = "wallet-registrar.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file path.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Chat platform credential. Consumed by the transport layer, never by
    /// the core.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Reject mixed-case addresses whose EIP-55 checksum does not match.
    /// When false, a mismatch is accepted and logged.
    #[serde(default = "default_true")]
    pub strict_checksum: bool,

    /// How long an idle awaiting-address session lives before eviction.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Upper bound for a single store upsert.
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("wallet_users.db")
}

fn default_true() -> bool {
    true
}

fn default_session_ttl_secs() -> u64 {
    900
}

fn default_store_timeout_secs() -> u64 {
    5
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bot_token: None,
            strict_checksum: default_true(),
            session_ttl_secs: default_session_ttl_secs(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl Config {
    /// Load `wallet-registrar.toml` from the working directory when present,
    /// then apply environment overrides.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => log::warn!("ignoring malformed config {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("could not read config {}: {}", path.display(), e),
            }
        }

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("WALLET_DB_PATH") {
            self.database_path = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("WALLET_BOT_TOKEN") {
            self.bot_token = Some(value);
        }
        if let Ok(value) = std::env::var("WALLET_STRICT_CHECKSUM") {
            self.strict_checksum = parse_bool_env(&value);
        }
        if let Ok(value) = std::env::var("WALLET_SESSION_TTL_SECS") {
            if let Ok(secs) = value.parse() {
                self.session_ttl_secs = secs;
            }
        }
        if let Ok(value) = std::env::var("WALLET_STORE_TIMEOUT_SECS") {
            if let Ok(secs) = value.parse() {
                self.store_timeout_secs = secs;
            }
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
