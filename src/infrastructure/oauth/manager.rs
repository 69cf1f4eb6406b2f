use async_trait::async_trait;
use tokio::sync::Mutex;

/// A resolved bearer credential.
///
/// Implementations cache their token and refresh it when it nears expiry.
#[async_trait]
pub trait Credential: Send + Sync {
    /// Return a currently valid access token, refreshing if needed
    async fn access_token(&mut self) -> Result<String, String>;
}

/// Locates and loads ambient credentials
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self) -> Result<Box<dyn Credential>, String>;
}

/// Source of bearer tokens for outbound provider calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<String, CredentialError>;

    /// Short label describing the credential cache, for readiness reporting
    fn status(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CredentialError {
    /// Credentials could not be located or loaded; cached for the process lifetime
    #[error("{0}")]
    Resolution(String),
    /// Token refresh failed; retried on the next call
    #[error("Failed to refresh access token: {0}")]
    Refresh(String),
}

/// Credential cache slot.
///
/// Resolution happens once: a failure moves to `Failed` and is never retried.
/// Refresh failures leave the slot in `Resolved` so the next call tries again.
pub enum CredentialState {
    Unresolved,
    Resolved(Box<dyn Credential>),
    Failed(String),
}

impl CredentialState {
    pub fn label(&self) -> &'static str {
        match self {
            CredentialState::Unresolved => "unresolved",
            CredentialState::Resolved(_) => "resolved",
            CredentialState::Failed(_) => "failed",
        }
    }
}

pub struct CredentialManager {
    resolver: Box<dyn CredentialResolver>,
    state: Mutex<CredentialState>,
}

impl CredentialManager {
    pub fn new(resolver: Box<dyn CredentialResolver>) -> Self {
        Self {
            resolver,
            state: Mutex::new(CredentialState::Unresolved),
        }
    }

    async fn resolve(&self) -> CredentialState {
        match self.resolver.resolve().await {
            Ok(credential) => {
                tracing::info!("Google Cloud credentials resolved");
                CredentialState::Resolved(credential)
            }
            Err(reason) => {
                tracing::warn!(
                    error = %reason,
                    "Google Cloud credential resolution failed, caching failure"
                );
                CredentialState::Failed(reason)
            }
        }
    }

    async fn current_token(credential: &mut dyn Credential) -> Result<String, CredentialError> {
        credential.access_token().await.map_err(|e| {
            tracing::warn!(error = %e, "Access token refresh failed");
            CredentialError::Refresh(e)
        })
    }
}

#[async_trait]
impl TokenProvider for CredentialManager {
    async fn get_token(&self) -> Result<String, CredentialError> {
        let mut state = self.state.lock().await;

        if let CredentialState::Unresolved = *state {
            *state = self.resolve().await;
        }

        match &mut *state {
            CredentialState::Resolved(credential) => Self::current_token(credential.as_mut()).await,
            CredentialState::Failed(reason) => Err(CredentialError::Resolution(reason.clone())),
            CredentialState::Unresolved => Err(CredentialError::Resolution(
                "credentials were not resolved".to_string(),
            )),
        }
    }

    fn status(&self) -> &'static str {
        // A held lock means a resolution or refresh is in flight
        self.state
            .try_lock()
            .map(|state| state.label())
            .unwrap_or("refreshing")
    }
}
