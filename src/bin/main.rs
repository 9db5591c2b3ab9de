use bookkeeping_assistant::{
    config::AssistantConfig,
    intent::IntentPipeline,
    oracle::{GeminiConnector, RotatingClient},
    session::run_session,
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the dialogue
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠️  {}", e);
            eprintln!("📌 Set GEMINI_API_KEYS in your environment or .env file");
            std::process::exit(2);
        }
    };

    info!(
        model = %config.model,
        credentials = config.credentials.len(),
        "Bookkeeping assistant starting"
    );

    let connector = GeminiConnector::new(config.request_timeout)?;
    let mut client = RotatingClient::new(Box::new(connector), config.credentials)?;
    if let Some(max_retries) = config.max_retries {
        client = client.with_max_retries(max_retries);
    }

    let mut pipeline = IntentPipeline::new(client, config.model);

    run_session(
        &mut pipeline,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    Ok(())
}
