use crate::domain::tts::{Provider, SynthesisRequest, SynthesisResult, TtsServiceError};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google Cloud Gemini TTS, OpenAI, ...)
///
/// Implementations are responsible for:
/// - Applying provider-specific defaults (voice, language, format)
/// - Validating or mapping the request onto the provider vocabulary
/// - Authenticating the outbound call
/// - Returning base64 audio plus a word-count duration estimate
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Provider served by this repository
    fn provider(&self) -> Provider;

    /// Short readiness label (e.g. `configured`, `not_configured`)
    fn status(&self) -> &'static str;

    /// Synthesize the request text to speech
    ///
    /// # Errors
    /// Returns `NotConfigured` when credentials are missing, `Invalid` for
    /// values outside the provider vocabulary, `Provider` when the provider
    /// rejects the call and `Other` for transport failures.
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, TtsServiceError>;
}
