// Configuration loading and parsing (provider.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub llm: LlmConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// provider.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire provider.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ProviderFile {
    provider: ProviderConfig,
    llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the statistics API.
    pub base_url: String,
    /// When set, tool calls are satisfied from in-memory fixtures instead
    /// of the network. Threaded into the dispatcher at construction; never
    /// read from process-wide state after startup.
    #[serde(default)]
    pub enable_mocks: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard ceiling on tool-calling rounds per user turn. Once reached,
    /// the final request is issued without tools so the model must answer
    /// in prose.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_max_tool_rounds() -> usize {
    6
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
    pub provider_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/provider.toml` and
/// (optionally) `config/credentials.toml`, relative to the given base
/// directory.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- provider.toml (required) ---
    let provider_path = config_dir.join("provider.toml");
    let provider_text = read_file(&provider_path)?;
    let provider_file: ProviderFile =
        toml::from_str(&provider_text).map_err(|e| ConfigError::ParseError {
            path: provider_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        provider: provider_file.provider,
        llm: provider_file.llm,
        credentials,
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "provider.base_url".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "provider.timeout_secs".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.llm.max_tool_rounds == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tool_rounds".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_provider_file(text: &str) -> Result<Config, ConfigError> {
        let provider_file: ProviderFile =
            toml::from_str(text).map_err(|e| ConfigError::ParseError {
                path: PathBuf::from("provider.toml"),
                source: e,
            })?;
        let config = Config {
            provider: provider_file.provider,
            llm: provider_file.llm,
            credentials: CredentialsConfig::default(),
        };
        validate(&config)?;
        Ok(config)
    }

    // -- full file parses --

    #[test]
    fn full_provider_file_parses() {
        let config = parse_provider_file(
            r#"
            [provider]
            base_url = "https://api.example.com/v1"
            enable_mocks = true
            timeout_secs = 10

            [llm]
            model = "claude-sonnet-4-5-20250929"
            max_tokens = 2048
            max_tool_rounds = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.base_url, "https://api.example.com/v1");
        assert!(config.provider.enable_mocks);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.max_tool_rounds, 4);
    }

    // -- defaults --

    #[test]
    fn optional_fields_take_defaults() {
        let config = parse_provider_file(
            r#"
            [provider]
            base_url = "https://api.example.com/v1"

            [llm]
            model = "claude-sonnet-4-5-20250929"
            "#,
        )
        .unwrap();

        assert!(!config.provider.enable_mocks);
        assert_eq!(config.provider.timeout_secs, 15);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.llm.max_tool_rounds, 6);
    }

    // -- validation --

    #[test]
    fn empty_base_url_rejected() {
        let err = parse_provider_file(
            r#"
            [provider]
            base_url = ""

            [llm]
            model = "m"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "provider.base_url"));
    }

    #[test]
    fn zero_tool_rounds_rejected() {
        let err = parse_provider_file(
            r#"
            [provider]
            base_url = "https://api.example.com/v1"

            [llm]
            model = "m"
            max_tool_rounds = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "llm.max_tool_rounds"));
    }

    // -- missing file --

    #[test]
    fn missing_provider_file_reported() {
        let err = load_config_from(Path::new("/nonexistent-touchline-test")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    // -- credentials parsing --

    #[test]
    fn credentials_parse_with_partial_keys() {
        let credentials: CredentialsConfig =
            toml::from_str(r#"anthropic_api_key = "sk-ant-test""#).unwrap();
        assert_eq!(credentials.anthropic_api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(credentials.provider_api_key, None);
    }
}
