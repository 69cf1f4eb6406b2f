use super::tts_repository::TtsRepository;
use crate::domain::tts::{
    estimate_duration_ms, AudioFormat, Provider, SynthesisRequest, SynthesisResult,
    TtsServiceError,
};
use crate::infrastructure::oauth::{CredentialError, TokenProvider};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const GEMINI_TTS_MODEL: &str = "gemini-2.5-flash-tts";
const DEFAULT_VOICE: &str = "Kore";
const DEFAULT_LANGUAGE: &str = "en-US";

/// Google Cloud TTS `audioEncoding` values used by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Mp3,
    Linear16,
    OggOpus,
}

impl AudioEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
        }
    }
}

impl From<AudioFormat> for AudioEncoding {
    fn from(format: AudioFormat) -> Self {
        match format {
            AudioFormat::Mp3 => AudioEncoding::Mp3,
            AudioFormat::Wav => AudioEncoding::Linear16,
            AudioFormat::Ogg | AudioFormat::Opus => AudioEncoding::OggOpus,
            AudioFormat::Aac | AudioFormat::Flac | AudioFormat::Pcm => AudioEncoding::Mp3,
        }
    }
}

/// Format Google will actually produce for a requested format name.
/// Anything it cannot produce degrades to mp3 instead of failing.
pub fn resolve_format(requested: &str) -> AudioFormat {
    match requested.parse::<AudioFormat>() {
        Ok(format @ (AudioFormat::Mp3 | AudioFormat::Wav | AudioFormat::Ogg | AudioFormat::Opus)) => {
            format
        }
        Ok(AudioFormat::Aac | AudioFormat::Flac | AudioFormat::Pcm) | Err(_) => {
            AudioFormat::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechRequest<'a> {
    pub input: SynthesisInput<'a>,
    pub voice: VoiceSelectionParams<'a>,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams<'a> {
    pub language_code: &'a str,
    pub name: &'a str,
    pub model_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: AudioEncoding,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech (Gemini model) implementation of TTS repository
pub struct GeminiTtsRepository {
    http_client: reqwest::Client,
    token_provider: Arc<dyn TokenProvider>,
    endpoint: String,
}

impl GeminiTtsRepository {
    pub fn new(
        http_client: reqwest::Client,
        token_provider: Arc<dyn TokenProvider>,
        endpoint: String,
    ) -> Self {
        Self {
            http_client,
            token_provider,
            endpoint,
        }
    }

    fn not_configured(error: &CredentialError) -> TtsServiceError {
        TtsServiceError::NotConfigured(format!(
            "Google Cloud TTS not configured. Set up authentication using one of:\n\
             1. Service account: export GOOGLE_APPLICATION_CREDENTIALS=/path/to/key.json\n\
             2. Key file: place service-account-key.json in the working directory \
             (or point GOOGLE_SERVICE_ACCOUNT_KEY at it)\n\
             3. Application Default Credentials: gcloud auth application-default login\n\
             Error: {}",
            error
        ))
    }
}

#[async_trait]
impl TtsRepository for GeminiTtsRepository {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn status(&self) -> &'static str {
        self.token_provider.status()
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, TtsServiceError> {
        let start_time = std::time::Instant::now();

        let voice = request.voice_or(DEFAULT_VOICE);
        let language = request.language_or(DEFAULT_LANGUAGE);
        let format = resolve_format(request.audio_format_or_default());
        let encoding = AudioEncoding::from(format);

        let token = self
            .token_provider
            .get_token()
            .await
            .map_err(|e| Self::not_configured(&e))?;

        let body = SynthesizeSpeechRequest {
            input: SynthesisInput {
                text: &request.text,
                prompt: request.prompt(),
            },
            voice: VoiceSelectionParams {
                language_code: language,
                name: voice,
                model_name: GEMINI_TTS_MODEL,
            },
            audio_config: AudioConfig {
                audio_encoding: encoding,
            },
        };

        tracing::info!(
            model = GEMINI_TTS_MODEL,
            voice = voice,
            language = language,
            encoding = encoding.as_str(),
            has_prompt = request.prompt().is_some(),
            text_length = request.text.len(),
            "Calling Google Cloud TTS API"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = voice, "Google Cloud TTS request failed");
                anyhow!("Google Cloud TTS error: {}", e)
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                voice = voice,
                "Google Cloud TTS API returned an error"
            );
            return Err(TtsServiceError::Provider {
                provider: Provider::Gemini,
                status: status.as_u16(),
                message: format!("Gemini API error: {}", error_text),
            });
        }

        let payload = response
            .json::<SynthesizeSpeechResponse>()
            .await
            .map_err(|e| anyhow!("Google Cloud TTS error: invalid response body: {}", e))?;

        tracing::info!(
            provider = "gemini",
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            audio_base64_length = payload.audio_content.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResult {
            audio_data: payload.audio_content,
            audio_format: format.as_str().to_string(),
            duration_ms: estimate_duration_ms(&request.text),
            metadata: json!({
                "provider": Provider::Gemini.as_str(),
                "voice": voice,
                "language": language,
                "model": GEMINI_TTS_MODEL,
            }),
        })
    }
}
