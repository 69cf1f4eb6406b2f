use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Assumed speaking rate for duration estimates
const WORDS_PER_MINUTE: f64 = 150.0;

/// Audio container/codec names accepted across providers.
/// Each provider supports a subset, see the repositories for the mappings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
    Opus,
    Aac,
    Flac,
    Pcm,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Ogg,
        AudioFormat::Opus,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Pcm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Opus => "opus",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// Formats accepted by the public HTTP endpoint
    pub fn is_http_accepted(&self) -> bool {
        !matches!(self, AudioFormat::Pcm)
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported audio format: {0}")]
pub struct UnknownAudioFormat(pub String);

impl FromStr for AudioFormat {
    type Err = UnknownAudioFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownAudioFormat(s.to_string()))
    }
}

/// Count words separated by runs of whitespace
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate spoken duration from the word count at a fixed 150 wpm.
/// This never looks at the produced audio.
pub fn estimate_duration_ms(text: &str) -> u64 {
    let words = word_count(text) as f64;
    ((words / WORDS_PER_MINUTE) * 60.0 * 1000.0).round() as u64
}
