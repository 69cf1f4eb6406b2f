use httpmock::MockServer;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tts_gateway::controllers::tts::TtsController;
use tts_gateway::domain::tts::TtsService;
use tts_gateway::infrastructure::config::{Config, Environment, LogFormat, ProviderConfig};
use tts_gateway::infrastructure::http::build_router;

pub mod api_client;
pub mod assertions;

use api_client::TestClient;

pub const TOKEN_PATH: &str = "/token";
pub const GOOGLE_TTS_PATH: &str = "/v1/text:synthesize";
pub const OPENAI_SPEECH_PATH: &str = "/v1/audio/speech";
pub const TEST_OPENAI_KEY: &str = "sk-test-key";
pub const TEST_ACCESS_TOKEN: &str = "ya29.test-access-token";

// Opt-in log output for debugging: RUST_LOG=tts_gateway=debug cargo test
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    /// Stands in for Google OAuth, Google Cloud TTS and OpenAI
    pub mock_server: MockServer,
    _credentials_dir: TempDir,
}

impl TestContext {
    /// Boot the app with both providers configured against the mock server
    pub async fn new() -> Self {
        Self::with_overrides(|_| {}).await
    }

    /// Boot the app after adjusting the default test configuration
    pub async fn with_overrides(adjust: impl FnOnce(&mut Config)) -> Self {
        Lazy::force(&TRACING);

        let mock_server = MockServer::start_async().await;
        let credentials_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let credentials_path = write_authorized_user_file(&credentials_dir, &mock_server);

        let mut config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            providers: ProviderConfig {
                openai_api_key: Some(TEST_OPENAI_KEY.to_string()),
                openai_api_base: mock_server.url("/v1"),
                google_application_credentials: Some(credentials_path),
                google_service_account_key: credentials_dir
                    .path()
                    .join("service-account-key.json"),
                google_tts_url: mock_server.url(GOOGLE_TTS_PATH),
                provider_timeout_secs: 5,
            },
        };
        adjust(&mut config);

        let tts_service =
            Arc::new(TtsService::from_config(&config.providers).expect("Failed to build TTS service"));
        let tts_controller = Arc::new(TtsController::new(tts_service.clone()));
        let app = build_router(tts_controller, tts_service);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&base_url),
            config,
            mock_server,
            _credentials_dir: credentials_dir,
        }
    }

    /// Point the Google credentials at a file that does not exist
    pub async fn without_google_credentials() -> Self {
        Self::with_overrides(|config| {
            let providers = &mut config.providers;
            let missing = providers
                .google_service_account_key
                .with_file_name("missing-credentials.json");
            providers.google_application_credentials = Some(missing);
        })
        .await
    }

    pub async fn without_openai_key() -> Self {
        Self::with_overrides(|config| config.providers.openai_api_key = None).await
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        TestContext::new()
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Mock server and temp dir are released on drop
        }
    }
}

fn write_authorized_user_file(dir: &TempDir, mock_server: &MockServer) -> PathBuf {
    let path = dir.path().join("application_default_credentials.json");
    let contents = serde_json::json!({
        "type": "authorized_user",
        "client_id": "test-client-id.apps.googleusercontent.com",
        "client_secret": "test-client-secret",
        "refresh_token": "test-refresh-token",
        "token_uri": mock_server.url(TOKEN_PATH),
    });
    std::fs::write(&path, contents.to_string()).expect("Failed to write credentials file");
    path
}
