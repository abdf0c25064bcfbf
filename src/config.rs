use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, warn};
use serde::Deserialize;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP settings taken from the `email` section of the config file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EmailConfig {
    /// If false no email is ever sent
    pub enabled: bool,

    pub smtp_server: String,

    pub smtp_port: u16,

    /// Used both for authentication and as the sender address
    pub username: String,

    pub password: String,

    pub recipients: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            username: String::new(),
            password: String::new(),
            recipients: Vec::new(),
        }
    }
}

/// Only the parts of the shared config file this program cares about
#[derive(Debug, Deserialize)]
struct ConfigFile {
    email: Option<EmailConfig>,
}

/// Ordered list of places the config file may live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSearch {
    candidates: Vec<PathBuf>,
}

impl ConfigSearch {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// `config/config.json`, `../config/config.json` then `~/.bitrecover/config.json`
    pub fn standard() -> Self {
        let mut candidates = vec![
            PathBuf::from("config/config.json"),
            PathBuf::from("../config/config.json"),
        ];
        match env::var_os("HOME") {
            Some(home) => candidates.push(Path::new(&home).join(".bitrecover/config.json")),
            None => debug!("HOME not set, skipping config in home folder"),
        }
        Self { candidates }
    }

    /// Standard search with `explicit` (if any) tried first
    pub fn with_override(explicit: Option<PathBuf>) -> Self {
        let mut result = Self::standard();
        if let Some(path) = explicit {
            result.candidates.insert(0, path);
        }
        result
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Returns the `email` section of the first candidate that has one.
    ///
    /// Never fails, unreadable candidates are logged and skipped and if
    /// nothing usable is found the defaults (notifications disabled) are used.
    pub fn load(&self) -> EmailConfig {
        for path in &self.candidates {
            if !path.exists() {
                debug!("No config at {path:?}");
                continue;
            }
            match load_email_section(path) {
                Ok(Some(config)) => {
                    debug!("Email config loaded from {path:?}");
                    return config;
                }
                Ok(None) => debug!("No email section in {path:?}"),
                Err(e) => warn!("Could not load config from {path:?}: {e:#}"),
            }
        }
        debug!("No email config found, using defaults");
        EmailConfig::default()
    }
}

fn load_email_section(config_path: &Path) -> anyhow::Result<Option<EmailConfig>> {
    let file_contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
    let result: ConfigFile = serde_json::from_str(&file_contents)
        .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
    Ok(result.email)
}
