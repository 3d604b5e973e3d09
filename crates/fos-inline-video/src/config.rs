//! Player Configuration

use serde::Deserialize;
use serde_json::Value;

use crate::src_mapper::{DEFAULT_AUDIO_EXTENSION, SrcMapper};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for audio source mapping: expected string or null, found {0}")]
    InvalidMapper(&'static str),

    #[error("Invalid audio extension: {0:?}")]
    InvalidExtension(String),

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Player configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Constant audio source for every video; `null` derives it from the
    /// video source. Kept untyped so the mapper can reject other values.
    pub audio_src: Value,

    /// Extension the derived audio source gets
    pub audio_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_src: Value::Null,
            audio_extension: DEFAULT_AUDIO_EXTENSION.to_string(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Use one audio source for every video
    pub fn with_audio_src(mut self, audio_src: impl Into<String>) -> Self {
        self.audio_src = Value::String(audio_src.into());
        self
    }

    /// Resolve the configured mapping
    pub fn src_mapper(&self) -> Result<SrcMapper, ConfigError> {
        match &self.audio_src {
            Value::String(audio_src) => Ok(SrcMapper::constant(audio_src.as_str())),
            Value::Null => {
                let extension = self.audio_extension.as_str();
                if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(ConfigError::InvalidExtension(self.audio_extension.clone()));
                }
                Ok(SrcMapper::Extension(self.audio_extension.clone()))
            }
            other => Err(ConfigError::InvalidMapper(value_kind(other))),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
