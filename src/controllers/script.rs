//! stdin/stdout JSON entry point shared by the `tts-gemini` and `tts-openai` binaries.
//!
//! One JSON object is read from stdin and exactly one JSON object is written
//! to stdout. Every failure, panics included, is rendered as
//! `{"error": ..., "success": false}` and the process exits 0.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::tts::{
    Provider, SynthesisRequest, SynthesisResponse, TtsService, TtsServiceApi, TtsServiceError,
};
use crate::infrastructure::config::ProviderConfig;

/// Script input: the HTTP request fields minus `service`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScriptRequest {
    pub text: String,
    pub voice: Option<String>,
    pub language: Option<String>,
    pub audio_format: Option<String>,
    pub prompt: Option<String>,
    pub instructions: Option<String>,
    pub speed: Option<f32>,
}

impl ScriptRequest {
    pub fn into_synthesis_request(self, provider: Provider) -> SynthesisRequest {
        SynthesisRequest {
            text: self.text,
            service: provider.as_str().to_string(),
            voice: self.voice,
            language: self.language,
            audio_format: self.audio_format,
            prompt: self.prompt,
            instructions: self.instructions,
            speed: self.speed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptResponse {
    Success {
        #[serde(flatten)]
        response: SynthesisResponse,
        success: bool,
    },
    Failure {
        error: String,
        success: bool,
    },
}

impl ScriptResponse {
    pub fn success(response: SynthesisResponse) -> Self {
        Self::Success {
            response,
            success: true,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": e.to_string(), "success": false }).to_string()
        })
    }
}

/// Parse, validate and synthesize one script invocation
pub async fn run_script<S>(service: &S, provider: Provider, input: &str) -> ScriptResponse
where
    S: TtsServiceApi + ?Sized,
{
    let request: ScriptRequest = match serde_json::from_str(input) {
        Ok(request) => request,
        Err(e) => return ScriptResponse::failure(format!("Invalid JSON input: {}", e)),
    };

    let request = request.into_synthesis_request(provider);

    let result = match request.validate() {
        Ok(()) => service.synthesize(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => ScriptResponse::success(SynthesisResponse::from(result)),
        Err(e) => {
            tracing::warn!(provider = %provider, error = %e, "Script synthesis failed");
            ScriptResponse::failure(script_error_message(&e))
        }
    }
}

fn script_error_message(error: &TtsServiceError) -> String {
    match error {
        TtsServiceError::Other(e) => format!("{:#}", e),
        other => other.to_string(),
    }
}

/// `run_script` with panics rendered as an `Internal error` failure
pub async fn run_with_input<S>(service: &S, provider: Provider, input: &str) -> ScriptResponse
where
    S: TtsServiceApi + ?Sized,
{
    guarded(run_script(service, provider, input)).await
}

async fn guarded<F>(future: F) -> ScriptResponse
where
    F: Future<Output = ScriptResponse>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unexpected failure".to_string());
            tracing::error!(error = %message, "Script panicked");
            ScriptResponse::failure(format!("Internal error: {}", message))
        }
    }
}

/// Full process lifecycle for a provider binary. Always prints one JSON line.
pub async fn run(provider: Provider) {
    init_stderr_logging();

    let response = guarded(execute(provider)).await;

    println!("{}", response.to_json());
}

async fn execute(provider: Provider) -> ScriptResponse {
    let mut input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
        return ScriptResponse::failure(format!("Failed to read stdin: {}", e));
    }

    // Provider settings only; server variables such as PORT are irrelevant here
    let config = match ProviderConfig::from_env() {
        Ok(config) => config,
        Err(e) => return ScriptResponse::failure(format!("Configuration error: {}", e)),
    };

    let service = match TtsService::from_config(&config) {
        Ok(service) => service,
        Err(e) => return ScriptResponse::failure(format!("Initialization error: {:#}", e)),
    };

    run_script(&service, provider, &input).await
}

fn init_stderr_logging() {
    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tts_gateway=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
