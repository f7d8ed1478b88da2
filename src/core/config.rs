//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ProviderKind;
use crate::inference::summarizer::DEFAULT_SUMMARY_INSTRUCTION;
use crate::inference::{ChatClient, ResponsesProvider, Summarizer};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AiConfig {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SummaryConfig {
    pub enabled: Option<bool>,
    pub model: Option<String>,
    pub instruction: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub provider: ProviderKind,
    pub model_name: String,
    /// Base URL as configured; see [`ResolvedConfig::api_base`] for the one in use.
    pub base_url: String,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub log_level: LevelFilter,
    pub summary: ResolvedSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSummary {
    pub enabled: bool,
    pub model: String,
    pub instruction: String,
}

impl ResolvedConfig {
    /// API base actually used for requests.
    ///
    /// Trailing slashes are dropped. Ollama serves its OpenAI-compatible API under
    /// `/v1`, which is appended when the configured URL lacks it.
    pub fn api_base(&self) -> String {
        normalize_base_url(self.provider, &self.base_url)
    }

    /// Builds the streaming backend for this config.
    pub fn responses_provider(&self) -> Result<ResponsesProvider, ConfigError> {
        let api_key = self.checked_api_key()?;
        Ok(ResponsesProvider::new(
            self.provider.name(),
            self.api_base(),
            api_key,
        ))
    }

    /// Builds the summarizer, or `None` when summaries are disabled.
    pub fn summarizer(&self) -> Result<Option<Summarizer>, ConfigError> {
        if !self.summary.enabled {
            return Ok(None);
        }
        let api_key = self.checked_api_key()?;
        let client = ChatClient::new(self.provider.name(), self.api_base(), api_key);
        Ok(Some(Summarizer::new(
            client,
            self.summary.model.clone(),
            self.summary.instruction.clone(),
        )))
    }

    fn checked_api_key(&self) -> Result<Option<String>, ConfigError> {
        match &self.api_key {
            Some(key) => Ok(Some(key.clone())),
            None if self.provider.requires_api_key() => {
                Err(ConfigError::MissingApiKey(self.provider))
            }
            None => Ok(None),
        }
    }
}

/// Normalizes a configured base URL for `provider`.
pub fn normalize_base_url(provider: ProviderKind, base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if provider == ProviderKind::Ollama && !trimmed.ends_with("/v1") {
        format!("{trimmed}/v1")
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    MissingApiKey(ProviderKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingApiKey(provider) => {
                let hint = provider
                    .api_key_env()
                    .map(|var| format!(" or set {var}"))
                    .unwrap_or_default();
                write!(
                    f,
                    "{} needs an API key: set ai.api_key in the config file{hint}",
                    provider.name()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `path`, or from `~/.parley/config.toml` when `None`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# parley configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"               # "error", "warn", "info", "debug", "trace", "off"
# system_prompt = "You are a helpful assistant."

# [ai]
# provider = "ollama"                # "openai", "ollama", "lmstudio", "openrouter"
# model = "llama3.2"
# base_url = "http://localhost:11434"  # "/v1" is appended for ollama
# api_key = "sk-..."                 # Or OPENAI_API_KEY / OPENROUTER_API_KEY / PARLEY_API_KEY

# [summary]
# enabled = false                    # Keep a rolling summary of the conversation
# model = "llama3.2"                 # Defaults to ai.model
# instruction = "Summarize the conversation so far."
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
///
/// `cli_provider` and `cli_model` are from CLI flags (None = not specified).
pub fn resolve(
    config: &ParleyConfig,
    cli_provider: Option<ProviderKind>,
    cli_model: Option<&str>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_provider, cli_model, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env<E>(
    config: &ParleyConfig,
    cli_provider: Option<ProviderKind>,
    cli_model: Option<&str>,
    env: E,
) -> ResolvedConfig
where
    E: Fn(&str) -> Option<String>,
{
    // Provider: CLI → env → config → default
    let env_provider = env("PARLEY_PROVIDER").and_then(|value| {
        let parsed = ProviderKind::from_str(&value);
        if parsed.is_err() {
            warn!("Ignoring unknown PARLEY_PROVIDER value '{}'", value);
        }
        parsed.ok()
    });
    let provider = cli_provider
        .or(env_provider)
        .or(config.ai.provider)
        .unwrap_or_default();

    // Model: CLI → env → config → provider default
    let model_name = cli_model
        .map(str::to_string)
        .or_else(|| env("PARLEY_MODEL"))
        .or_else(|| config.ai.model.clone())
        .unwrap_or_else(|| provider.default_model().to_string());

    // Base URL: env → config → provider default
    let base_url = env("PARLEY_BASE_URL")
        .or_else(|| config.ai.base_url.clone())
        .unwrap_or_else(|| provider.default_base_url().to_string());

    // API key: generic env → provider env → config
    let api_key = env("PARLEY_API_KEY")
        .or_else(|| provider.api_key_env().and_then(&env))
        .or_else(|| config.ai.api_key.clone())
        .filter(|key| !key.trim().is_empty());

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| {
            let parsed = LevelFilter::from_str(level);
            if parsed.is_err() {
                warn!("Ignoring unknown log level '{}'", level);
            }
            parsed.ok()
        })
        .unwrap_or(LevelFilter::Debug);

    let summary = ResolvedSummary {
        enabled: config.summary.enabled.unwrap_or(false),
        model: config
            .summary
            .model
            .clone()
            .unwrap_or_else(|| model_name.clone()),
        instruction: config
            .summary
            .instruction
            .clone()
            .unwrap_or_else(|| DEFAULT_SUMMARY_INSTRUCTION.to_string()),
    };

    ResolvedConfig {
        provider,
        model_name,
        base_url,
        api_key,
        system_prompt: config.general.system_prompt.clone(),
        log_level,
        summary,
    }
}
