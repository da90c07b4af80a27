//! Q&A server binary
//!
//! Run with: cargo run -p ambedkar-rag --bin ambedkar-rag-server

use ambedkar_rag::{config::RagConfig, server::ApiServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambedkar_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  Ask Dr. Ambedkar — RAG API               ║
║        Qdrant retrieval + Gemini answer generation        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::from_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Retrieval strategy: {:?}", config.retrieval.strategy);
    tracing::info!("  - Generation model: {}", config.gemini.model);
    tracing::info!("  - API keys configured: {}", config.gemini.api_keys.len());
    tracing::info!("  - Rate-limit policy: {:?}", config.gemini.rate_limit_policy);
    if config.gemini.api_keys.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; every answer will be the configuration error");
    }

    let server = ApiServer::new(config)?;

    println!("\nServer starting...");
    println!("  Ask:      POST http://{}/ask", server.address());
    println!("  Liveness: GET  http://{}/", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
