//! Store credential resolution.
//!
//! Credentials are resolved once at startup by a [`CredentialProvider`] and
//! handed to the store adapter, so tests can substitute a fixed value.

use async_trait::async_trait;
use mongodb::options::Credential;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub struct StoreCredential {
    pub username: String,
    pub password: Secret<String>,
}

impl StoreCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn into_mongo(self) -> Credential {
        let mut credential = Credential::default();
        credential.username = Some(self.username);
        credential.password = Some(self.password.expose_secret().clone());
        credential
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// `None` means the connection string carries whatever the store needs.
    async fn resolve(&self) -> Result<Option<StoreCredential>, AppError>;
}

/// Reads the credential the hosting environment provides: `COSMOS_USERNAME`
/// plus `COSMOS_PASSWORD`, or the password mounted as a secret file.
pub struct AmbientCredentialProvider {
    username: Option<String>,
    password: Option<Secret<String>>,
    password_file: PathBuf,
}

impl AmbientCredentialProvider {
    pub fn new(
        username: Option<String>,
        password: Option<String>,
        password_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()).map(Secret::new),
            password_file: password_file.into(),
        }
    }

    pub fn from_env(password_file: impl Into<PathBuf>) -> Self {
        Self::new(
            env::var("COSMOS_USERNAME").ok(),
            env::var("COSMOS_PASSWORD").ok(),
            password_file,
        )
    }
}

#[async_trait]
impl CredentialProvider for AmbientCredentialProvider {
    async fn resolve(&self) -> Result<Option<StoreCredential>, AppError> {
        let Some(username) = &self.username else {
            tracing::info!("No store username set, relying on the connection string");
            return Ok(None);
        };

        if let Some(password) = &self.password {
            tracing::info!(username = %username, "Using store credential from environment");
            return Ok(Some(StoreCredential::new(
                username.clone(),
                password.expose_secret().clone(),
            )));
        }

        let password = tokio::fs::read_to_string(&self.password_file)
            .await
            .map_err(|e| {
                tracing::error!(
                    path = %self.password_file.display(),
                    "Failed to read store password secret: {}",
                    e
                );
                AppError::ConfigError(anyhow::anyhow!(
                    "COSMOS_USERNAME is set but no password was found in COSMOS_PASSWORD or {}",
                    self.password_file.display()
                ))
            })?;
        tracing::info!(username = %username, "Using store credential from secret file");

        Ok(Some(StoreCredential::new(
            username.clone(),
            password.trim().to_string(),
        )))
    }
}

/// Fixed credential, mostly for tests.
#[derive(Default)]
pub struct StaticCredentialProvider {
    credential: Option<(String, String)>,
}

impl StaticCredentialProvider {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credential: Some((username.into(), password.into())),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn resolve(&self) -> Result<Option<StoreCredential>, AppError> {
        Ok(self
            .credential
            .as_ref()
            .map(|(user, pass)| StoreCredential::new(user.clone(), pass.clone())))
    }
}
