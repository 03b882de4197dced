use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::time::Duration;

use crate::providers::AiProvider;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a create-form request body (text fields plus both uploads)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite://data.db` or `sqlite::memory:`
    #[serde(skip_serializing, default = "default_database_url")]
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// S3-compatible endpoint. A bare `host:port` is treated as plain http.
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    #[serde(skip_serializing, default = "default_storage_secret")]
    pub secret_key: SecretString,
    pub bucket: String,
    pub force_path_style: bool,
    pub presign_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    pub default_provider: AiProvider,
    /// Either `model` or `provider:model`
    pub default_model: String,
    pub openai: OpenAiConfig,
    pub openrouter: Option<OpenRouterConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(skip_serializing, default = "empty_secret")]
    pub api_key: SecretString,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    #[serde(skip_serializing)]
    pub api_key: SecretString,
}

/// Unprefixed variable names from the original deployment, mapped to config keys.
/// `OJOU__*` variables take precedence over these.
const LEGACY_ENV: [(&str, &str); 8] = [
    ("DATABASE_URL", "database.url"),
    ("MINIO_ENDPOINT", "storage.endpoint"),
    ("MINIO_ACCESS_KEY", "storage.access_key"),
    ("MINIO_SECRET_KEY", "storage.secret_key"),
    ("MINIO_BUCKET", "storage.bucket"),
    ("OPENAI_API_KEY", "ai.openai.api_key"),
    ("OPENAI_API_BASE", "ai.openai.base_url"),
    ("CHAT_MODEL", "ai.default_model"),
];

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::load_from(std::env::vars().collect())
    }

    /// Build configuration from an explicit set of environment variables.
    pub fn load_from(env: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(legacy_environment(&env)?)
            // Override with environment variables using `OJOU__` prefix and `__` separator
            // e.g., OJOU__STORAGE__BUCKET="my-bucket"
            .add_source(
                config::Environment::with_prefix("OJOU")
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env)),
            )
            .build()?;

        config.try_deserialize()
    }
}

fn legacy_environment(
    env: &config::Map<String, String>,
) -> Result<config::Config, config::ConfigError> {
    LEGACY_ENV
        .iter()
        .filter(|(var, _)| env.get(*var).is_some_and(|value| !value.is_empty()))
        .try_fold(config::Config::builder(), |builder, (var, key)| {
            builder.set_override_option(*key, env.get(*var).cloned())
        })?
        .build()
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    /// Endpoint with a scheme, as required by the S3 client.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            self.endpoint.clone()
        } else {
            format!("http://{}", self.endpoint)
        }
    }

    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_seconds)
    }
}

// Secrets are never serialized, so the layered defaults cannot carry them.
fn default_database_url() -> SecretString {
    "sqlite://data.db".to_string().into()
}

fn default_storage_secret() -> SecretString {
    "minioadmin".to_string().into()
}

fn empty_secret() -> SecretString {
    String::new().into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:9000".to_string(),
            region: "us-east-1".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: default_storage_secret(),
            bucket: "ojousama-bucket".to_string(),
            force_path_style: true,
            // SigV4 caps presigned URLs at one week
            presign_ttl_seconds: 7 * 24 * 60 * 60,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: AiProvider::OpenAi,
            default_model: "qwen2:0.5b".to_string(),
            openai: OpenAiConfig::default(),
            openrouter: None,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: empty_secret(),
            base_url: None,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped via #[serde(skip_serializing)]
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
