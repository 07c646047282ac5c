//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.gemchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GemchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub reveal_interval_ms: Option<u64>,
    pub response_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub storage_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 75;
/// Reveal ticks are never scheduled faster than this.
pub const MIN_REVEAL_INTERVAL_MS: u64 = 1;
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "Help me plan a game night with my 5 best friends for under $100.",
    "What are the best tips to improve my public speaking skills?",
    "Can you help me find the latest news on web development?",
    "Write JavaScript code to sum all elements in an array.",
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
    pub reveal_interval: Duration,
    pub response_delay: Duration,
    pub request_timeout: Duration,
    pub storage_path: PathBuf,
    pub suggestions: Vec<String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub reveal_ms: Option<u64>,
    pub storage: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.gemchat`.
pub fn gemchat_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".gemchat"))
}

/// Returns the path to `~/.gemchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    gemchat_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.gemchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GemchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<GemchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(GemchatConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path. See [`load_config`].
pub fn load_config_from(path: &Path) -> Result<GemchatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(GemchatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GemchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Never log the API key.
    debug!(
        "Config: general={:?}, gemini.base_url={:?}, gemini.model={:?}, {} suggestions",
        config.general,
        config.gemini.base_url,
        config.gemini.model,
        config.suggestions.len()
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# gemchat configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# reveal_interval_ms = 75            # Delay between revealed words (min 1)
# response_delay_ms = 500            # Pause before the request is sent
# request_timeout_secs = 60          # Give up on the service after this long
# storage_path = "/home/me/.gemchat/storage.json"

# [gemini]
# api_key = "AIza..."                # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1"
# model = "gemini-pro"

# suggestions = [
#     "Help me plan a game night with my 5 best friends for under $100.",
#     "What are the best tips to improve my public speaking skills?",
# ]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GemchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    // API key: env → config
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| config.gemini.api_key.clone());

    // Base URL: env → config → default
    let base_url = std::env::var("GEMINI_BASE_URL")
        .ok()
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| std::env::var("GEMINI_MODEL").ok())
        .or_else(|| config.gemini.model.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

    let reveal_ms = cli
        .reveal_ms
        .or(config.general.reveal_interval_ms)
        .unwrap_or(DEFAULT_REVEAL_INTERVAL_MS)
        .max(MIN_REVEAL_INTERVAL_MS);

    // Storage: CLI → config → ~/.gemchat/storage.json → ./gemchat-storage.json
    let storage_path = cli
        .storage
        .clone()
        .or_else(|| config.general.storage_path.as_ref().map(PathBuf::from))
        .or_else(|| gemchat_dir().map(|d| d.join("storage.json")))
        .unwrap_or_else(|| PathBuf::from("gemchat-storage.json"));

    let suggestions = if config.suggestions.is_empty() {
        DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        config.suggestions.clone()
    };

    ResolvedConfig {
        api_key,
        base_url,
        model_name,
        reveal_interval: Duration::from_millis(reveal_ms),
        response_delay: Duration::from_millis(
            config
                .general
                .response_delay_ms
                .unwrap_or(DEFAULT_RESPONSE_DELAY_MS),
        ),
        request_timeout: Duration::from_secs(
            config
                .general
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        storage_path,
        suggestions,
    }
}
