//! Configuration loading for the Leadscout API.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `LEADSCOUT_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application configuration derived from `LEADSCOUT_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operator_tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apify_token: Option<String>,
    #[serde(default = "default_apify_api_base")]
    pub apify_api_base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    #[serde(default = "default_anthropic_api_base")]
    pub anthropic_api_base: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_pitch_max_tokens")]
    pub pitch_max_tokens: u32,
    #[serde(default = "default_search_term")]
    pub default_search_term: String,
    #[serde(default = "default_region")]
    pub default_region: String,
    #[serde(default = "default_max_leads")]
    pub default_max_leads: u32,
    #[serde(default = "default_enrich_max_pages")]
    pub enrich_max_pages: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_bind_addr: default_api_bind_addr(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            operator_tokens: Vec::new(),
            apify_token: None,
            apify_api_base: default_apify_api_base(),
            anthropic_api_key: None,
            anthropic_api_base: default_anthropic_api_base(),
            anthropic_model: default_anthropic_model(),
            pitch_max_tokens: default_pitch_max_tokens(),
            default_search_term: default_search_term(),
            default_region: default_region(),
            default_max_leads: default_max_leads(),
            enrich_max_pages: default_enrich_max_pages(),
        }
    }
}

impl AppConfig {
    /// Returns the configured bind address as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.api_bind_addr.parse()
    }

    /// Returns a redacted JSON representation (secrets are redacted).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        if !config.operator_tokens.is_empty() {
            config.operator_tokens = vec!["[REDACTED]".to_string()];
        }
        if config.apify_token.is_some() {
            config.apify_token = Some("[REDACTED]".to_string());
        }
        if config.anthropic_api_key.is_some() {
            config.anthropic_api_key = Some("[REDACTED]".to_string());
        }
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration, returning an error if required settings
    /// are missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Authentication fails closed: every profile requires tokens.
        if self.operator_tokens.is_empty() {
            return Err(ConfigError::MissingOperatorTokens);
        }

        // Provider credentials are only enforced outside local/test, where
        // the provider bases usually point at mock servers.
        if !matches!(self.profile.as_str(), "local" | "test") {
            if self.apify_token.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::MissingApifyToken);
            }
            if self.anthropic_api_key.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::MissingAnthropicApiKey);
            }
        }

        if self.pitch_max_tokens == 0 {
            return Err(ConfigError::InvalidPitchMaxTokens {
                value: self.pitch_max_tokens,
            });
        }
        if self.default_max_leads == 0 || self.default_max_leads > 500 {
            return Err(ConfigError::InvalidDefaultMaxLeads {
                value: self.default_max_leads,
            });
        }
        if self.enrich_max_pages == 0 || self.enrich_max_pages > 50 {
            return Err(ConfigError::InvalidEnrichMaxPages {
                value: self.enrich_max_pages,
            });
        }

        Ok(())
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "sqlite://data/leads.db?mode=rwc".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_acquire_timeout_ms() -> u64 {
    5000
}

fn default_apify_api_base() -> String {
    "https://api.apify.com".to_string()
}

fn default_anthropic_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_pitch_max_tokens() -> u32 {
    300
}

fn default_search_term() -> String {
    "hovenier".to_string()
}

fn default_region() -> String {
    "Zuid-Holland, Nederland".to_string()
}

fn default_max_leads() -> u32 {
    50
}

fn default_enrich_max_pages() -> u32 {
    5
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid api bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error(
        "no operator tokens configured; set LEADSCOUT_OPERATOR_TOKEN or LEADSCOUT_OPERATOR_TOKENS"
    )]
    MissingOperatorTokens,
    #[error("Apify token is missing; set LEADSCOUT_APIFY_TOKEN environment variable")]
    MissingApifyToken,
    #[error("Anthropic API key is missing; set LEADSCOUT_ANTHROPIC_API_KEY environment variable")]
    MissingAnthropicApiKey,
    #[error("pitch max tokens must be positive, got {value}")]
    InvalidPitchMaxTokens { value: u32 },
    #[error("default max leads must be between 1 and 500, got {value}")]
    InvalidDefaultMaxLeads { value: u32 },
    #[error("enrich max pages must be between 1 and 50, got {value}")]
    InvalidEnrichMaxPages { value: u32 },
}

/// Loads configuration using layered `.env` files and `LEADSCOUT_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads configuration from layered env files with the process
    /// environment overlaid last.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix("LEADSCOUT_") {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_bind_addr = layered
            .remove("API_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_bind_addr);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let database_url = layered
            .remove("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_database_url);
        let db_max_connections = layered
            .remove("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = layered
            .remove("DB_ACQUIRE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_acquire_timeout_ms);

        // Support both a single token and a comma-separated list.
        let operator_tokens = if let Some(tokens) = layered.remove("OPERATOR_TOKENS") {
            tokens
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        } else if let Some(token) = layered.remove("OPERATOR_TOKEN") {
            vec![token]
        } else {
            Vec::new()
        };

        let apify_token = layered.remove("APIFY_TOKEN").filter(|v| !v.is_empty());
        let apify_api_base = layered
            .remove("APIFY_API_BASE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_apify_api_base);
        let anthropic_api_key = layered
            .remove("ANTHROPIC_API_KEY")
            .filter(|v| !v.is_empty());
        let anthropic_api_base = layered
            .remove("ANTHROPIC_API_BASE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_anthropic_api_base);
        let anthropic_model = layered
            .remove("ANTHROPIC_MODEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_anthropic_model);
        let pitch_max_tokens = layered
            .remove("PITCH_MAX_TOKENS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_pitch_max_tokens);
        let default_search_term = layered
            .remove("DEFAULT_SEARCH_TERM")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_search_term);
        let default_region = layered
            .remove("DEFAULT_REGION")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_region);
        let default_max_leads = layered
            .remove("DEFAULT_MAX_LEADS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_leads);
        let enrich_max_pages = layered
            .remove("ENRICH_MAX_PAGES")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_enrich_max_pages);

        let config = AppConfig {
            profile,
            api_bind_addr,
            log_level,
            log_format,
            database_url,
            db_max_connections,
            db_acquire_timeout_ms,
            operator_tokens,
            apify_token,
            apify_api_base,
            anthropic_api_key,
            anthropic_api_base,
            anthropic_model,
            pitch_max_tokens,
            default_search_term,
            default_region,
            default_max_leads,
            enrich_max_pages,
        };

        config.validate()?;

        match config.bind_addr() {
            Ok(_) => Ok(config),
            Err(source) => Err(ConfigError::InvalidBindAddr {
                value: config.api_bind_addr.clone(),
                source,
            }),
        }
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var("LEADSCOUT_PROFILE")
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix("LEADSCOUT_") {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
