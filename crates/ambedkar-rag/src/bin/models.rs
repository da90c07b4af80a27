//! Model discovery
//!
//! Lists the models available to the configured credential that support
//! `generateContent`, for picking a `GEMINI_MODEL` value.
//!
//! Run with: cargo run -p ambedkar-rag --bin ambedkar-rag-models

use anyhow::bail;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ambedkar_rag::config::RagConfig;
use ambedkar_rag::providers::GeminiCompletion;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambedkar_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::from_env();
    let Some(api_key) = config.gemini.api_keys.first() else {
        bail!("GEMINI_API_KEY is not set");
    };

    let client = GeminiCompletion::new(&config.gemini)?;
    let models = client.list_generation_models(api_key).await?;

    if models.is_empty() {
        println!("No generation-capable models found for this key.");
        println!("Check that the Generative Language API is enabled for your project.");
        return Ok(());
    }

    println!("Models supporting generateContent:");
    for model in &models {
        if model.display_name.is_empty() {
            println!("  {}", model.name);
        } else {
            println!("  {} ({})", model.name, model.display_name);
        }
    }
    println!("\nSet GEMINI_MODEL to one of these (without the 'models/' prefix).");

    Ok(())
}
