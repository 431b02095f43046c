use std::path::Path;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::infrastructure::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

use super::Environment;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("llm.api_key is empty; set API_KEY or APP__LLM__API_KEY")]
    MissingApiKey,
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub ocr: OcrSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub binary: String,
    pub language: String,
    pub threads: usize,
    pub timeout_secs: u64,
    pub min_confidence: f32,
    pub implicit_rows: bool,
    pub borderless_tables: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

const DEFAULTS: &[(&str, &str)] = &[
    ("server.host", "0.0.0.0"),
    ("server.port", "5000"),
    ("server.max_upload_bytes", "26214400"),
    ("llm.api_key", ""),
    ("llm.model", DEFAULT_MODEL),
    ("llm.base_url", DEFAULT_BASE_URL),
    ("llm.request_timeout_secs", "60"),
    ("llm.max_attempts", "2"),
    ("llm.retry_delay_ms", "2000"),
    ("ocr.binary", "tesseract"),
    ("ocr.language", "eng"),
    ("ocr.threads", "1"),
    ("ocr.timeout_secs", "60"),
    ("ocr.min_confidence", "50"),
    ("ocr.implicit_rows", "true"),
    ("ocr.borderless_tables", "true"),
    ("logging.json", "false"),
];

impl Settings {
    /// Loads settings from the working directory. See [`Settings::load_from`].
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        Self::load_from(Path::new("."), environment)
    }

    /// Layers, lowest to highest precedence: built-in defaults,
    /// `{dir}/appsettings.{environment}.toml`, `APP__SECTION__KEY` variables,
    /// then `API_KEY` and `PORT`.
    pub fn load_from(dir: &Path, environment: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        for (key, value) in DEFAULTS {
            builder = builder.set_default(*key, *value)?;
        }

        let file = dir.join(format!("appsettings.{}", environment.as_str()));
        let settings: Settings = builder
            .add_source(File::with_name(&file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("llm.api_key", std::env::var("API_KEY").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        if self.llm.max_attempts == 0 {
            return Err(SettingsError::Invalid {
                key: "llm.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.ocr.min_confidence) {
            return Err(SettingsError::Invalid {
                key: "ocr.min_confidence",
                reason: format!("{} is outside 0-100", self.ocr.min_confidence),
            });
        }
        Ok(())
    }
}
