use super::tts_repository::TtsRepository;
use crate::domain::tts::{
    estimate_duration_ms, is_valid_speed, AudioFormat, Provider, SynthesisRequest,
    SynthesisResult, TtsServiceError, MAX_SPEED, MIN_SPEED,
};
use anyhow::anyhow;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;

pub const OPENAI_TTS_MODEL: &str = "gpt-4o-mini-tts";
const DEFAULT_VOICE: &str = "alloy";
const DEFAULT_SPEED: f32 = 1.0;

/// Voices offered by the OpenAI speech endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }
}

impl FromStr for Voice {
    type Err = TtsServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .into_iter()
            .find(|voice| voice.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Voice::ALL.iter().map(|v| v.as_str()).collect();
                TtsServiceError::Invalid(format!(
                    "Invalid voice. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// `response_format` values accepted by the OpenAI speech endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl SpeechFormat {
    pub const ALL: [SpeechFormat; 6] = [
        SpeechFormat::Mp3,
        SpeechFormat::Opus,
        SpeechFormat::Aac,
        SpeechFormat::Flac,
        SpeechFormat::Wav,
        SpeechFormat::Pcm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechFormat::Mp3 => "mp3",
            SpeechFormat::Opus => "opus",
            SpeechFormat::Aac => "aac",
            SpeechFormat::Flac => "flac",
            SpeechFormat::Wav => "wav",
            SpeechFormat::Pcm => "pcm",
        }
    }

    pub fn from_audio_format(format: AudioFormat) -> Option<Self> {
        match format {
            AudioFormat::Mp3 => Some(SpeechFormat::Mp3),
            AudioFormat::Opus => Some(SpeechFormat::Opus),
            AudioFormat::Aac => Some(SpeechFormat::Aac),
            AudioFormat::Flac => Some(SpeechFormat::Flac),
            AudioFormat::Wav => Some(SpeechFormat::Wav),
            AudioFormat::Pcm => Some(SpeechFormat::Pcm),
            AudioFormat::Ogg => None,
        }
    }
}

impl FromStr for SpeechFormat {
    type Err = TtsServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<AudioFormat>()
            .ok()
            .and_then(SpeechFormat::from_audio_format)
            .ok_or_else(|| {
                let valid: Vec<&str> = SpeechFormat::ALL.iter().map(|f| f.as_str()).collect();
                TtsServiceError::Invalid(format!(
                    "Invalid audio format. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateSpeechRequest<'a> {
    pub model: &'a str,
    pub voice: Voice,
    pub input: &'a str,
    pub response_format: SpeechFormat,
    pub speed: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
}

/// Drain a chunked byte stream into one buffer, preserving arrival order
pub async fn collect_chunks<S, B, E>(stream: S) -> Result<Vec<u8>, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    futures::pin_mut!(stream);

    let mut buffer = Vec::new();
    let mut chunk_count = 0usize;

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(chunk?.as_ref());
        chunk_count += 1;
    }

    tracing::debug!(
        chunk_count = chunk_count,
        audio_size = buffer.len(),
        "Audio stream drained"
    );

    Ok(buffer)
}

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    http_client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
}

impl OpenAiTtsRepository {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, api_base: String) -> Self {
        Self {
            http_client,
            api_key,
            api_base,
        }
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn status(&self) -> &'static str {
        if self.api_key.is_some() {
            "configured"
        } else {
            "not_configured"
        }
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, TtsServiceError> {
        let start_time = std::time::Instant::now();

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TtsServiceError::NotConfigured(
                "OpenAI TTS not configured. Set OPENAI_API_KEY in .env".to_string(),
            )
        })?;

        let voice: Voice = request.voice_or(DEFAULT_VOICE).parse()?;
        let response_format: SpeechFormat = request.audio_format_or_default().parse()?;
        let speed = request.speed.unwrap_or(DEFAULT_SPEED);
        if !is_valid_speed(speed) {
            return Err(TtsServiceError::Invalid(format!(
                "Speed must be between {} and {}",
                MIN_SPEED, MAX_SPEED
            )));
        }
        let instructions = request.instructions();

        let body = CreateSpeechRequest {
            model: OPENAI_TTS_MODEL,
            voice,
            input: &request.text,
            response_format,
            speed,
            instructions,
        };

        tracing::info!(
            model = OPENAI_TTS_MODEL,
            voice = voice.as_str(),
            response_format = response_format.as_str(),
            speed = speed,
            has_instructions = instructions.is_some(),
            text_length = request.text.len(),
            "Calling OpenAI TTS API"
        );

        let response = self
            .http_client
            .post(self.speech_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    voice = voice.as_str(),
                    "OpenAI TTS API call failed"
                );
                anyhow!("OpenAI API error: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                voice = voice.as_str(),
                "OpenAI TTS API returned an error"
            );
            return Err(TtsServiceError::Provider {
                provider: Provider::OpenAi,
                status: status.as_u16(),
                message: format!("OpenAI API error: {}", error_text),
            });
        }

        let audio_bytes = collect_chunks(response.bytes_stream())
            .await
            .map_err(|e| anyhow!("OpenAI API error: {}", e))?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "openai",
            model = OPENAI_TTS_MODEL,
            voice = voice.as_str(),
            latency_ms = duration.as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResult {
            audio_data: STANDARD.encode(&audio_bytes),
            audio_format: response_format.as_str().to_string(),
            duration_ms: estimate_duration_ms(&request.text),
            metadata: json!({
                "provider": Provider::OpenAi.as_str(),
                "voice": voice.as_str(),
                "instructions": instructions,
                "model": OPENAI_TTS_MODEL,
            }),
        })
    }
}
