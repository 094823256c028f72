use crate::error::{EduragError, Result};
use crate::models::CitationStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the trainer
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub chunk_size: ConfigValue<usize>,
    pub chunk_overlap: ConfigValue<usize>,
    pub top_k: ConfigValue<usize>,
    pub citation_style: ConfigValue<CitationStyle>,
    pub model: ConfigValue<String>,
    pub base_url: ConfigValue<String>,
    pub timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            chunk_size: ConfigValue::new(1200, ConfigSource::Default),
            chunk_overlap: ConfigValue::new(200, ConfigSource::Default),
            top_k: ConfigValue::new(8, ConfigSource::Default),
            citation_style: ConfigValue::new(CitationStyle::Page, ConfigSource::Default),
            model: ConfigValue::new("qwen-plus-latest".to_string(), ConfigSource::Default),
            base_url: ConfigValue::new(
                "https://dashscope-intl.aliyuncs.com/compatible-mode/v1".to_string(),
                ConfigSource::Default,
            ),
            timeout_secs: ConfigValue::new(180, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| EduragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| EduragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(chunk_size) = file_config.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::File);
        }

        if let Some(chunk_overlap) = file_config.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::File);
        }

        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, ConfigSource::File);
        }

        if let Some(citation_style) = file_config.citation_style {
            self.citation_style.update(citation_style, ConfigSource::File);
        }

        if let Some(model) = file_config.model {
            self.model.update(model, ConfigSource::File);
        }

        if let Some(base_url) = file_config.base_url {
            self.base_url.update(base_url, ConfigSource::File);
        }

        if let Some(timeout_secs) = file_config.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // EDURAG_CHUNK_SIZE
        if let Ok(size_str) = env::var("EDURAG_CHUNK_SIZE") {
            match size_str.parse::<usize>() {
                Ok(size) => self.chunk_size.update(size, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid EDURAG_CHUNK_SIZE value '{}': expected positive integer",
                    size_str
                ),
            }
        }

        // EDURAG_CHUNK_OVERLAP
        if let Ok(overlap_str) = env::var("EDURAG_CHUNK_OVERLAP") {
            match overlap_str.parse::<usize>() {
                Ok(overlap) => self.chunk_overlap.update(overlap, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid EDURAG_CHUNK_OVERLAP value '{}': expected non-negative integer",
                    overlap_str
                ),
            }
        }

        // EDURAG_TOP_K
        if let Ok(k_str) = env::var("EDURAG_TOP_K") {
            match k_str.parse::<usize>() {
                Ok(k) => self.top_k.update(k, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid EDURAG_TOP_K value '{}': expected positive integer",
                    k_str
                ),
            }
        }

        // EDURAG_CITATION_STYLE
        if let Ok(style_str) = env::var("EDURAG_CITATION_STYLE") {
            match parse_citation_style(&style_str) {
                Ok(style) => self.citation_style.update(style, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid EDURAG_CITATION_STYLE value '{}': expected page or topic",
                    style_str
                ),
            }
        }

        // EDURAG_MODEL
        if let Ok(model) = env::var("EDURAG_MODEL") {
            self.model.update(model, ConfigSource::Environment);
        }

        // DASHSCOPE_BASE_URL
        if let Ok(base_url) = env::var("DASHSCOPE_BASE_URL") {
            self.base_url.update(base_url, ConfigSource::Environment);
        }

        // EDURAG_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("EDURAG_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid EDURAG_TIMEOUT_SECS value '{}': expected seconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::Cli);
        }

        if let Some(chunk_overlap) = overrides.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::Cli);
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, ConfigSource::Cli);
        }

        if let Some(citation_style) = overrides.citation_style {
            self.citation_style.update(citation_style, ConfigSource::Cli);
        }

        if let Some(model) = overrides.model {
            self.model.update(model, ConfigSource::Cli);
        }
    }

    /// Validate cross-field constraints after all layers are applied
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size.value == 0 {
            return Err(EduragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be positive".to_string(),
            });
        }

        if self.chunk_overlap.value >= self.chunk_size.value {
            return Err(EduragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "chunk_overlap ({}) must be less than chunk_size ({})",
                    self.chunk_overlap.value, self.chunk_size.value
                ),
            });
        }

        if self.top_k.value == 0 {
            return Err(EduragError::ConfigInvalid {
                key: "top_k".to_string(),
                reason: "top_k must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "chunk_size".to_string(),
            (self.chunk_size.value.to_string(), self.chunk_size.source),
        );

        map.insert(
            "chunk_overlap".to_string(),
            (self.chunk_overlap.value.to_string(), self.chunk_overlap.source),
        );

        map.insert("top_k".to_string(), (self.top_k.value.to_string(), self.top_k.source));

        map.insert(
            "citation_style".to_string(),
            (format!("{:?}", self.citation_style.value), self.citation_style.source),
        );

        map.insert("model".to_string(), (self.model.value.clone(), self.model.source));

        map.insert("base_url".to_string(), (self.base_url.value.clone(), self.base_url.source));

        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    top_k: Option<usize>,
    citation_style: Option<CitationStyle>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub top_k: Option<usize>,
    pub citation_style: Option<CitationStyle>,
    pub model: Option<String>,
}

/// Parse citation style from string
pub fn parse_citation_style(s: &str) -> Result<CitationStyle> {
    match s.to_lowercase().as_str() {
        "page" => Ok(CitationStyle::Page),
        "topic" => Ok(CitationStyle::Topic),
        _ => Err(EduragError::ConfigInvalid {
            key: "citation_style".to_string(),
            reason: format!("Invalid citation style: {}. Use page or topic", s),
        }),
    }
}
