use async_trait::async_trait;
use google_cloud_auth::credentials::{
    service_account, user_account, Builder as CredentialsBuilder, CacheableResource, Credentials,
};
use http::Extensions;
use serde_json::Value;
use std::path::PathBuf;

use super::manager::{Credential, CredentialResolver};
use crate::infrastructure::config::ProviderConfig;

pub const GOOGLE_CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where the credentials come from
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// A credentials file of type `service_account` or `authorized_user`
    File(PathBuf),
    /// The library's ambient lookup: gcloud profile, then the metadata server
    ApplicationDefault,
}

/// OAuth2 credential for Google Cloud APIs.
///
/// Token caching and expiry are handled by `google_cloud_auth`. A failed
/// token fetch rebuilds the underlying credentials so the next call starts
/// a fresh exchange.
pub struct GoogleCredential {
    source: CredentialSource,
    credentials: Credentials,
}

impl GoogleCredential {
    pub fn from_source(source: CredentialSource) -> Result<Self, String> {
        let credentials = build_credentials(&source)?;
        Ok(Self {
            source,
            credentials,
        })
    }

    async fn fetch_token(&self) -> Result<String, String> {
        let headers = self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(|e| e.to_string())?;

        let header_map = match headers {
            CacheableResource::New { data, .. } => data,
            CacheableResource::NotModified => {
                return Err("token source returned no headers".to_string());
            }
        };

        let value = header_map
            .get(http::header::AUTHORIZATION)
            .ok_or_else(|| "no Authorization header in credentials response".to_string())?
            .to_str()
            .map_err(|e| format!("invalid Authorization header value: {}", e))?;

        value
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| "Authorization header is not a Bearer token".to_string())
    }
}

#[async_trait]
impl Credential for GoogleCredential {
    async fn access_token(&mut self) -> Result<String, String> {
        match self.fetch_token().await {
            Ok(token) => Ok(token),
            Err(reason) => {
                // Drop any cached failure inside the library
                self.credentials = build_credentials(&self.source)?;
                Err(reason)
            }
        }
    }
}

fn scopes() -> Vec<String> {
    vec![GOOGLE_CLOUD_PLATFORM_SCOPE.to_string()]
}

fn build_credentials(source: &CredentialSource) -> Result<Credentials, String> {
    match source {
        CredentialSource::File(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                format!("Failed to read credentials file '{}': {}", path.display(), e)
            })?;
            let json: Value = serde_json::from_str(&contents)
                .map_err(|e| format!("Invalid Google credentials file: {}", e))?;
            credentials_from_json(json)
        }
        CredentialSource::ApplicationDefault => CredentialsBuilder::default()
            .with_scopes(scopes())
            .build()
            .map_err(|e| format!("Your default credentials were not found: {}", e)),
    }
}

/// Dispatch on the file's `type` field
pub fn credentials_from_json(json: Value) -> Result<Credentials, String> {
    let credential_type = json
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    match credential_type.as_str() {
        "service_account" => service_account::Builder::new(json)
            .with_access_specifier(service_account::AccessSpecifier::from_scopes(scopes()))
            .build()
            .map_err(|e| format!("Invalid service account credentials: {}", e)),
        "authorized_user" => user_account::Builder::new(json)
            .with_scopes(scopes())
            .build()
            .map_err(|e| format!("Invalid authorized user credentials: {}", e)),
        other => Err(format!(
            "Invalid Google credentials file: unsupported type '{}', expected 'service_account' or 'authorized_user'",
            other
        )),
    }
}

/// Application-default credential lookup:
/// explicit path, then the well-known key file, then the library's ADC chain.
pub struct AdcResolver {
    explicit_path: Option<PathBuf>,
    well_known_path: PathBuf,
}

impl AdcResolver {
    pub fn new(explicit_path: Option<PathBuf>, well_known_path: PathBuf) -> Self {
        Self {
            explicit_path,
            well_known_path,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            config.google_application_credentials.clone(),
            config.google_service_account_key.clone(),
        )
    }

    pub fn locate(&self) -> Result<CredentialSource, String> {
        if let Some(path) = &self.explicit_path {
            // An explicit path never falls through to the defaults
            return if path.is_file() {
                Ok(CredentialSource::File(path.clone()))
            } else {
                Err(format!(
                    "File {} was not found (set by GOOGLE_APPLICATION_CREDENTIALS)",
                    path.display()
                ))
            };
        }

        if self.well_known_path.is_file() {
            return Ok(CredentialSource::File(self.well_known_path.clone()));
        }

        Ok(CredentialSource::ApplicationDefault)
    }
}

#[async_trait]
impl CredentialResolver for AdcResolver {
    async fn resolve(&self) -> Result<Box<dyn Credential>, String> {
        install_crypto_provider();

        let source = self.locate()?;
        tracing::info!(source = ?source, "Loading Google Cloud credentials");
        let credential = GoogleCredential::from_source(source)?;
        Ok(Box::new(credential))
    }
}

/// rustls needs a process-wide provider before the auth client's first TLS handshake
fn install_crypto_provider() {
    // Err means one is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();
}
