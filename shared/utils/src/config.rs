use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::DocubricksResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Run the reference validator after a document is loaded.
    pub validate_references: bool,
    /// Fail the load when the validator reports error-severity issues.
    pub reject_on_errors: bool,
    pub max_document_bytes: u64,
}

impl AppConfig {
    pub fn load() -> DocubricksResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // e.g. DOCUBRICKS__LOADER__REJECT_ON_ERRORS=true
            .add_source(Environment::with_prefix("DOCUBRICKS").separator("__"));

        Self::from_builder(config)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> DocubricksResult<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_path: None,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            validate_references: true,
            reject_on_errors: false,
            max_document_bytes: 32 * 1024 * 1024, // 32MB
        }
    }
}
