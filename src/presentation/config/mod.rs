mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LlmSettings, LoggingSettings, OcrSettings, ServerSettings, Settings, SettingsError,
};
