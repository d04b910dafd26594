use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::ledger::TokenRates;
use crate::core::prompt::{ResponseLength, ResponseStyle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// IANA timezone the exported summary is timestamped in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub pricing: TokenRates,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_timezone() -> String {
    "America/Sao_Paulo".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            pricing: TokenRates::default(),
            assistant: AssistantConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        Tz::from_str(&self.timezone)
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_style")]
    pub style: ResponseStyle,

    #[serde(default = "default_length")]
    pub length: ResponseLength,
}

fn default_style() -> ResponseStyle {
    ResponseStyle::Expository
}

fn default_length() -> ResponseLength {
    ResponseLength::Small
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            length: default_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Whether the system/context message appears as the first row of the
    /// exported transcript.
    #[serde(default = "default_include_context")]
    pub include_context: bool,
}

fn default_filename() -> String {
    "chat_transcript.pdf".into()
}

fn default_include_context() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            include_context: default_include_context(),
        }
    }
}

/// Load configuration: local `chatledger.json` in the working directory wins
/// over the global `<config_dir>/chatledger/config.json`; defaults otherwise.
pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let local_path = wd.join("chatledger.json");
    if local_path.exists() {
        return read_config(&local_path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("chatledger").join("config.json");
        if global_path.exists() {
            return read_config(&global_path);
        }
    }

    Ok(AppConfig::default())
}

fn read_config(path: &std::path::Path) -> Result<AppConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::File(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
}
