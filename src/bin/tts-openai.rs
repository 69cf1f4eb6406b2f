use tts_gateway::controllers::script;
use tts_gateway::domain::tts::Provider;

/// Reads one JSON request on stdin, writes one JSON result on stdout
#[tokio::main]
async fn main() {
    script::run(Provider::OpenAi).await;
}
