use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::cache::CacheScope;
use crate::parser::MarkerMatching;

/// Top-level configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Live assistant (chat completions) settings
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Reply parser settings
    #[serde(default)]
    pub parser: ParserConfig,
    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Configuration for the chat-completions assistant
#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Model identifier (e.g., "gpt-4", "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// How many earlier transcript messages are sent along with a prompt
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// API key for authentication (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            history_limit: default_history_limit(),
            timeout: default_timeout(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for the reply parser
#[derive(Debug, Deserialize, Clone)]
pub struct ParserConfig {
    /// Days from parse time until a parsed ingredient expires
    #[serde(default = "default_expiration_days")]
    pub expiration_days: i64,
    /// How section header lines are recognized
    #[serde(default)]
    pub marker_matching: MarkerMatching,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            expiration_days: default_expiration_days(),
            marker_matching: MarkerMatching::default(),
        }
    }
}

/// Configuration for the prompt/response cache
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Whose answers a lookup may return
    #[serde(default)]
    pub scope: CacheScope,
    /// JSON file backing the cache; in-memory when unset
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            scope: CacheScope::default(),
            path: None,
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    2500
}

fn default_history_limit() -> usize {
    20
}

fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_expiration_days() -> i64 {
    3
}

fn default_cache_enabled() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FRIDGECHEF__ prefix
    /// 2. fridgechef.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FRIDGECHEF__ASSISTANT__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("fridgechef").required(false))
        // Use double underscore for nested: FRIDGECHEF__PARSER__EXPIRATION_DAYS
        .add_source(
            Environment::with_prefix("FRIDGECHEF")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
