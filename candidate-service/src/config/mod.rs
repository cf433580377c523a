use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "mongodb://candidates-e4dee2.mongo.cosmos.azure.com:10255/?ssl=true&retrywrites=false";
pub const DEFAULT_DATABASE: &str = "CandidateDatabase";
pub const DEFAULT_CONTAINER: &str = "Candidates";
pub const DEFAULT_PASSWORD_FILE: &str = "/run/secrets/cosmos_password";

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Overrides the instance id lookup done at startup.
    pub instance_id: Option<String>,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// MongoDB-API connection string of the Cosmos account.
    pub endpoint: String,
    pub database: String,
    pub container: String,
    pub server_selection_timeout: Option<Duration>,
    pub password_file: String,
}

impl CandidateConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Every setting has
    /// a default, so an empty source yields a usable config.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_selection_timeout = match lookup("COSMOS_SERVER_SELECTION_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "COSMOS_SERVER_SELECTION_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?)),
            None => None,
        };

        Ok(CandidateConfig {
            common,
            service_name: get("SERVICE_NAME", "candidate-service"),
            log_level: get("LOG_LEVEL", "info"),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            instance_id: lookup("INSTANCE_ID").filter(|s| !s.is_empty()),
            store: StoreConfig {
                endpoint: get("COSMOS_ENDPOINT", DEFAULT_ENDPOINT),
                database: get("COSMOS_DATABASE_NAME", DEFAULT_DATABASE),
                container: get("COSMOS_CONTAINER_NAME", DEFAULT_CONTAINER),
                server_selection_timeout,
                password_file: get("COSMOS_PASSWORD_FILE", DEFAULT_PASSWORD_FILE),
            },
        })
    }
}
