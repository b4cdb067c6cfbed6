//! siterag server binary: load configuration, wire up the provider handles,
//! and serve the HTTP routes.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use siterag::completions::OpenAiCompletionProvider;
use siterag::config::Settings;
use siterag::embeddings::OpenAiEmbeddingProvider;
use siterag::http::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let state = Arc::new(AppState {
        embedder: Arc::new(OpenAiEmbeddingProvider::new(
            &settings.openai_api_key,
            &settings.embedding_model,
        )),
        completer: Arc::new(OpenAiCompletionProvider::new(
            &settings.openai_api_key,
            &settings.completion_model,
        )),
        settings,
    });

    let listener = TcpListener::bind(&state.settings.bind_addr).await?;
    tracing::info!("siterag listening on {}", state.settings.bind_addr);
    axum::serve(listener, http::router(state).into_make_service()).await?;

    Ok(())
}
