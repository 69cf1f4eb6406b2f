use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_SERVICE_ACCOUNT_KEY: &str = "service-account-key.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub providers: ProviderConfig,
}

/// Settings needed to reach the TTS providers.
///
/// The process entry points load only this, so server settings never
/// affect a one-shot synthesis.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    // OpenAI
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    // Google Cloud
    pub google_application_credentials: Option<PathBuf>,
    pub google_service_account_key: PathBuf,
    pub google_tts_url: String,
    // Outbound calls
    pub provider_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            providers: ProviderConfig::from_env()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(ProviderConfig {
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_api_base: optional_var("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            google_application_credentials: optional_var("GOOGLE_APPLICATION_CREDENTIALS")
                .map(PathBuf::from),
            google_service_account_key: optional_var("GOOGLE_SERVICE_ACCOUNT_KEY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_KEY)),
            google_tts_url: optional_var("GOOGLE_TTS_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_TTS_URL.to_string()),
            provider_timeout_secs: optional_var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()?,
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

/// Read an env var, treating empty values as unset
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
