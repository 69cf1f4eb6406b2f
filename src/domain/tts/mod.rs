pub mod audio;
pub mod dto;
pub mod error;
pub mod provider;
pub mod service;

pub use audio::{estimate_duration_ms, word_count, AudioFormat};
pub use dto::{
    is_valid_speed, SynthesisRequest, SynthesisResponse, SynthesisResult, MAX_SPEED,
    MAX_TEXT_CHARS, MIN_SPEED,
};
pub use error::TtsServiceError;
pub use provider::Provider;
pub use service::{TtsService, TtsServiceApi};
