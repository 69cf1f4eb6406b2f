pub mod google;
pub mod manager;

pub use google::{AdcResolver, CredentialSource, GoogleCredential, GOOGLE_CLOUD_PLATFORM_SCOPE};
pub use manager::{
    Credential, CredentialError, CredentialManager, CredentialResolver, CredentialState,
    TokenProvider,
};
