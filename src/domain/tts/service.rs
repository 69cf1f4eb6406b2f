use super::dto::{SynthesisRequest, SynthesisResult};
use super::error::TtsServiceError;
use super::provider::Provider;
use crate::infrastructure::config::ProviderConfig;
use crate::infrastructure::oauth::{AdcResolver, CredentialManager};
use crate::infrastructure::repositories::{GeminiTtsRepository, OpenAiTtsRepository, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Single dispatch point in front of the provider repositories
pub struct TtsService {
    gemini_repo: Arc<dyn TtsRepository>,
    openai_repo: Arc<dyn TtsRepository>,
}

impl TtsService {
    pub fn new(gemini_repo: Arc<dyn TtsRepository>, openai_repo: Arc<dyn TtsRepository>) -> Self {
        Self {
            gemini_repo,
            openai_repo,
        }
    }

    /// Wire the production repositories from configuration.
    ///
    /// One HTTP client (carrying the provider timeout) is shared by both
    /// providers. The credential cache lives as long as the returned service.
    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.provider_timeout())
            .build()?;

        let credentials = Arc::new(CredentialManager::new(Box::new(AdcResolver::from_config(
            config,
        ))));

        let gemini_repo = Arc::new(GeminiTtsRepository::new(
            http_client.clone(),
            credentials,
            config.google_tts_url.clone(),
        ));
        let openai_repo = Arc::new(OpenAiTtsRepository::new(
            http_client,
            config.openai_api_key.clone(),
            config.openai_api_base.clone(),
        ));

        tracing::info!(
            openai_configured = config.openai_api_key.is_some(),
            google_credentials_path = ?config.google_application_credentials,
            timeout_secs = config.provider_timeout_secs,
            "TTS providers initialized"
        );

        Ok(Self::new(gemini_repo, openai_repo))
    }

    fn repository(&self, provider: Provider) -> &Arc<dyn TtsRepository> {
        match provider {
            Provider::Gemini => &self.gemini_repo,
            Provider::OpenAi => &self.openai_repo,
        }
    }

    /// Readiness label per provider
    pub fn provider_status(&self) -> Vec<(Provider, &'static str)> {
        Provider::ALL
            .into_iter()
            .map(|provider| (provider, self.repository(provider).status()))
            .collect()
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text to speech with the provider named in the request
    ///
    /// This operation:
    /// - Resolves the `service` name to a provider (unknown names are rejected)
    /// - Delegates to that provider's repository
    ///
    /// There is no retry, no fallback to the other provider and no caching.
    async fn synthesize(&self, request: SynthesisRequest)
        -> Result<SynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisResult, TtsServiceError> {
        let provider: Provider = request.service.parse()?;

        tracing::info!(
            provider = %provider,
            text_length = request.text.len(),
            audio_format = request.audio_format_or_default(),
            "TTS synthesis request"
        );

        let repository = self.repository(provider);
        debug_assert_eq!(repository.provider(), provider);

        repository.synthesize(&request).await
    }
}
