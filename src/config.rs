use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub matchmaker: MatchmakerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchmakerSettings {
    #[serde(default = "default_location_weight")]
    pub location_weight: f64,
    #[serde(default = "default_budget_weight")]
    pub budget_weight: f64,
    #[serde(default = "default_tag_weight")]
    pub tag_weight: f64,
    #[serde(default = "default_word_weight")]
    pub word_weight: f64,
    #[serde(default = "default_match_threshold")]
    pub threshold: f64,
}

impl Default for MatchmakerSettings {
    fn default() -> Self {
        Self {
            location_weight: default_location_weight(),
            budget_weight: default_budget_weight(),
            tag_weight: default_tag_weight(),
            word_weight: default_word_weight(),
            threshold: default_match_threshold(),
        }
    }
}

fn default_location_weight() -> f64 { 3.0 }
fn default_budget_weight() -> f64 { 2.0 }
fn default_tag_weight() -> f64 { 1.0 }
fn default_word_weight() -> f64 { 0.5 }
fn default_match_threshold() -> f64 { 1.5 }

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub dir: String,
}

/// Settings for the OpenAI-compatible completion API.
///
/// An empty `api_key` disables the LLM path entirely; the advisor and
/// insight engines then run on templates and the receipt scanner on the
/// local line parser.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model: default_model(),
            api_version: default_api_version(),
            mode: default_mode(),
        }
    }
}

fn default_model() -> String { "gpt-4.1".to_string() }
fn default_api_version() -> String { "2024-12-01-preview".to_string() }
fn default_mode() -> String { "mock".to_string() }

impl CompletionSettings {
    /// Whether the LLM path is usable at all.
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty() && !self.endpoint.is_empty() && self.mode != "mock"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with STASH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with STASH_)
            // e.g., STASH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("STASH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("STASH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Fold the well-known completion API environment variables into the config.
/// AZURE_OPENAI_API_KEY / OPENAI_API_KEY take precedence over the config file
/// so deployments only need to export a key to switch off mock mode.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("AZURE_OPENAI_API_KEY")
        .or_else(|_| env::var("OPENAI_API_KEY"))
        .ok();
    let endpoint = env::var("AZURE_OPENAI_ENDPOINT").ok();
    let api_version = env::var("AZURE_OPENAI_API_VERSION").ok();
    let model = env::var("AI_MODEL").ok();
    let mode = env::var("AI_MODE").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("completion.api_key", api_key)?;
    }
    if let Some(endpoint) = endpoint {
        builder = builder.set_override("completion.endpoint", endpoint)?;
    }
    if let Some(api_version) = api_version {
        builder = builder.set_override("completion.api_version", api_version)?;
    }
    if let Some(model) = model {
        builder = builder.set_override("completion.model", model)?;
    }
    if let Some(mode) = mode {
        builder = builder.set_override("completion.mode", mode)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_defaults() {
        let completion = CompletionSettings::default();
        assert_eq!(completion.model, "gpt-4.1");
        assert_eq!(completion.mode, "mock");
        assert!(!completion.enabled());
    }

    #[test]
    fn test_completion_enabled_requires_key_and_endpoint() {
        let completion = CompletionSettings {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: "secret".to_string(),
            mode: "live".to_string(),
            ..CompletionSettings::default()
        };
        assert!(completion.enabled());

        let mock_mode = CompletionSettings {
            mode: "mock".to_string(),
            ..completion
        };
        assert!(!mock_mode.enabled());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_default_matchmaker_weights() {
        let matchmaker = MatchmakerSettings::default();
        assert_eq!(matchmaker.location_weight, 3.0);
        assert_eq!(matchmaker.budget_weight, 2.0);
        assert_eq!(matchmaker.tag_weight, 1.0);
        assert_eq!(matchmaker.word_weight, 0.5);
        assert_eq!(matchmaker.threshold, 1.5);
    }
}
