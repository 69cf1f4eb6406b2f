pub mod gemini_tts_repository;
pub mod openai_tts_repository;
pub mod tts_repository;

pub use gemini_tts_repository::GeminiTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use tts_repository::TtsRepository;
