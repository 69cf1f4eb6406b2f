use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        AudioFormat, SynthesisRequest, SynthesisResponse, TtsService, TtsServiceApi,
    },
    error::{AppError, AppResult},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/v1/tts/synthesize - Convert text to speech with the requested provider
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesisRequest>, JsonRejection>,
    ) -> AppResult<Json<SynthesisResponse>> {
        let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

        // Validate input
        request.validate()?;
        validate_http_audio_format(&request)?;

        let result = controller
            .tts_service
            .synthesize(request)
            .await
            .map_err(AppError::from)?;

        Ok(Json(SynthesisResponse::from(result)))
    }
}

/// The HTTP contract accepts a narrower format set than the process entry points
fn validate_http_audio_format(request: &SynthesisRequest) -> AppResult<()> {
    let accepted = request
        .audio_format_or_default()
        .parse::<AudioFormat>()
        .map(|format| format.is_http_accepted())
        .unwrap_or(false);

    if accepted {
        return Ok(());
    }

    let valid: Vec<&str> = AudioFormat::ALL
        .iter()
        .filter(|format| format.is_http_accepted())
        .map(|format| format.as_str())
        .collect();

    Err(AppError::BadRequest(format!(
        "audio_format must be one of: {}",
        valid.join(", ")
    )))
}
