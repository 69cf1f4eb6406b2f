use serde::{Deserialize, Serialize};

use super::audio::AudioFormat;
use super::error::TtsServiceError;

pub const MAX_TEXT_CHARS: usize = 5000;
pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

/// Normalized synthesis request shared by the HTTP and process entry points.
///
/// Fields that the selected provider does not use are ignored, never rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// BCP-47 language tag (gemini only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_format: Option<String>,
    /// Style prompt (gemini only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Tone/style instructions (openai only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Playback speed (openai only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl SynthesisRequest {
    /// Check the provider-independent bounds of the request
    pub fn validate(&self) -> Result<(), TtsServiceError> {
        if self.text.is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err(TtsServiceError::Invalid(format!(
                "Text must be {} characters or less",
                MAX_TEXT_CHARS
            )));
        }

        if let Some(speed) = self.speed {
            if !is_valid_speed(speed) {
                return Err(TtsServiceError::Invalid(format!(
                    "Speed must be between {} and {}",
                    MIN_SPEED, MAX_SPEED
                )));
            }
        }

        Ok(())
    }

    pub fn voice_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.voice).unwrap_or(default)
    }

    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.language).unwrap_or(default)
    }

    pub fn audio_format_or_default(&self) -> &str {
        non_empty(&self.audio_format).unwrap_or(AudioFormat::default().as_str())
    }

    pub fn prompt(&self) -> Option<&str> {
        non_empty(&self.prompt)
    }

    pub fn instructions(&self) -> Option<&str> {
        non_empty(&self.instructions)
    }
}

pub fn is_valid_speed(speed: f32) -> bool {
    (MIN_SPEED..=MAX_SPEED).contains(&speed)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Provider-independent synthesis outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Base64 encoded audio
    pub audio_data: String,
    /// Format actually produced by the provider
    pub audio_format: String,
    /// Word-count based estimate, not a measurement
    pub duration_ms: u64,
    pub metadata: serde_json::Value,
}

/// Response for POST /api/v1/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub audio_data: String,
    pub audio_format: String,
    pub duration_ms: u64,
    /// JSON encoded metadata object
    pub metadata: String,
}

impl From<SynthesisResult> for SynthesisResponse {
    fn from(result: SynthesisResult) -> Self {
        Self {
            audio_data: result.audio_data,
            audio_format: result.audio_format,
            duration_ms: result.duration_ms,
            metadata: result.metadata.to_string(),
        }
    }
}
