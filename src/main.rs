mod api; // HTTP surface
mod config;
mod error;
mod handlers;
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::{IngredientCategorizer, IngredientParser};
use services::{CompletionProvider, OpenAIService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting Pantry Assistant...");

    let config = Config::from_env();
    if config.openai_api_key.is_none() {
        log::warn!("⚠️ OPENAI_API_KEY not set, AI endpoints will answer 500 until it is configured");
    }

    let openai: Arc<dyn CompletionProvider> = Arc::new(OpenAIService::new(&config));
    log::info!("✅ OpenAI service initialized with model: {}", config.openai_model);

    let categorizer = Arc::new(IngredientCategorizer::new(openai.clone()));
    let parser = Arc::new(IngredientParser::new(openai.clone()));

    #[cfg(feature = "http-server")]
    {
        use api::server::create_router;

        let app = create_router(categorizer, parser);
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

        log::info!("🌐 HTTP server listening on {}", config.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = (categorizer, parser);
        log::warn!("⚠️ Built without the http-server feature, nothing to serve");
    }

    log::info!("🛑 Shutting down...");

    Ok(())
}

#[cfg(feature = "http-server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
    }
}
