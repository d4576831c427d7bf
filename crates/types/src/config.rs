use serde::{Deserialize, Serialize};

use billed_common::constants::DEFAULT_API_URL;

// ═══════════════════════════════════════════════════════════════════════
//  APP CONFIG: top-level, stored at ~/.billed/config.toml
// ═══════════════════════════════════════════════════════════════════════

/// Top-level configuration stored in `$HOME/.billed/config.toml`.
///
/// ```toml
/// [system]
/// verbose = false
///
/// [api]
/// base_url = "http://localhost:5678"
/// timeout_secs = 15
///
/// [display]
/// locale = "fr"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub system: SystemConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Enable verbose tracing output.
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Billed store API.
    pub base_url: String,
    /// Request timeout for store calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Language of formatted dates.
    #[serde(default)]
    pub locale: DateLocale,
}

/// Language used for short month names in formatted dates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    /// `4 Avr. 04`
    #[default]
    Fr,
    /// `4 Apr. 04`
    En,
}

impl std::fmt::Display for DateLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateLocale::Fr => write!(f, "fr"),
            DateLocale::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for DateLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fr" => Ok(DateLocale::Fr),
            "en" => Ok(DateLocale::En),
            other => Err(format!("Unknown locale: {other}. Use fr or en")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig { verbose: false },
            api: ApiConfig {
                base_url: String::from(DEFAULT_API_URL),
                timeout_secs: default_timeout_secs(),
            },
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Serialize to TOML for writing to disk.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
