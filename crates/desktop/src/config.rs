//! Runtime configuration from environment variables.

use std::path::PathBuf;

use anyhow::Context;
use equiptrack_inventory::STORAGE_KEY;
use equiptrack_observability::LogFormat;

pub const ENV_DB_PATH: &str = "EQUIPTRACK_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "EQUIPTRACK_STORAGE_KEY";
pub const ENV_LOG_FORMAT: &str = "EQUIPTRACK_LOG_FORMAT";
pub const ENV_ASSUME_YES: &str = "EQUIPTRACK_ASSUME_YES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    /// SQLite file; `None` means the per-user default location.
    pub db_path: Option<PathBuf>,
    pub storage_key: String,
    pub log_format: LogFormat,
    /// Confirm deletions without asking.
    pub assume_yes: bool,
    /// Problems found while reading the environment. Logged once tracing is
    /// up, since configuration is read before the subscriber exists.
    pub warnings: Vec<String>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_key: STORAGE_KEY.to_string(),
            log_format: LogFormat::default(),
            assume_yes: false,
            warnings: Vec::new(),
        }
    }
}

impl DesktopConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Invalid values fall back to
    /// the default and leave a warning behind.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        match lookup(ENV_STORAGE_KEY) {
            Some(key) if key.trim().is_empty() => config
                .warnings
                .push(format!("{ENV_STORAGE_KEY} is blank; using `{STORAGE_KEY}`")),
            Some(key) => config.storage_key = key,
            None => {}
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(e) => config.warnings.push(format!("{ENV_LOG_FORMAT}: {e}; using pretty")),
            }
        }

        if let Some(raw) = lookup(ENV_ASSUME_YES) {
            match parse_flag(&raw) {
                Some(flag) => config.assume_yes = flag,
                None => config
                    .warnings
                    .push(format!("{ENV_ASSUME_YES}: `{raw}` is not a boolean; prompting")),
            }
        }

        config
    }

    /// Explicit path, or `{app_data_dir}/equiptrack/inventory.db`.
    pub fn resolve_db_path(&self) -> anyhow::Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => equiptrack_infra::default_db_path()
                .context("no database path configured and no default location available"),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
