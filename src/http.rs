//! HTTP boundary: axum routes marshaling the crawl, question-answering, and
//! reset operations.
//!
//! Every handler opens its own [`PgVectorStore`] and closes it before
//! responding. Crawl and question failures surface as a 500 with the
//! failure's textual description; the reset route never raises and reports
//! failures in-band.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::completions::CompletionProvider;
use crate::config::Settings;
use crate::crawler::{self, CrawlReport, Crawler};
use crate::embeddings::EmbeddingProvider;
use crate::errors::RagError;
use crate::ingest::IngestionPipeline;
use crate::qa::{AnswerPipeline, AnswerSet, DEFAULT_TOP_K};
use crate::store::{DocumentStore, PgVectorStore};

/// Process-scoped state: configuration plus the provider handles built once
/// at startup.
pub struct AppState {
    pub settings: Settings,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub completer: Arc<dyn CompletionProvider>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ingest-url", post(ingest_url))
        .route("/ask-question", post(ask_question))
        .route("/reset-embeddings", delete(reset_embeddings))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to siterag! Use the API to crawl websites, store embeddings, and ask questions."
    }))
}

#[derive(Deserialize)]
struct IngestParams {
    url: String,
    #[serde(default = "default_depth")]
    max_depth: usize,
}

fn default_depth() -> usize {
    1
}

async fn ingest_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IngestParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    match run_ingest(&state, &params).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "message": "URL processed successfully!",
                "result": format!(
                    "stored {} of {} crawled pages ({} failed)",
                    report.pages_stored, report.pages_visited, report.pages_failed
                ),
            })),
        ),
        Err(err) => server_error(err),
    }
}

async fn run_ingest(state: &AppState, params: &IngestParams) -> Result<CrawlReport, RagError> {
    let store = Arc::new(PgVectorStore::connect(&state.settings.database_url()).await?);
    let client = crawler::http_client(
        &state.settings.user_agent,
        Duration::from_secs(state.settings.request_timeout_secs),
    )?;
    let pipeline = IngestionPipeline::new(state.embedder.clone(), store.clone());
    let crawler = Crawler::new(client, pipeline, params.url.clone(), params.max_depth);

    let result = crawler.run().await;
    store.close().await;
    result
}

#[derive(Deserialize)]
struct AskParams {
    question: String,
}

async fn ask_question(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AskParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    match run_ask(&state, &params.question).await {
        Ok(answer) => (
            StatusCode::OK,
            Json(json!({ "question": params.question, "answer": answer })),
        ),
        Err(err) => server_error(err),
    }
}

async fn run_ask(state: &AppState, question: &str) -> Result<AnswerSet, RagError> {
    let store = PgVectorStore::connect(&state.settings.database_url()).await?;
    let pipeline = AnswerPipeline::new(state.embedder.clone(), state.completer.clone());

    let result = pipeline.answer(&store, question, DEFAULT_TOP_K).await;
    store.close().await;
    result
}

async fn reset_embeddings(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match run_reset(&state).await {
        Ok(()) => Json(json!({
            "status": "success",
            "message": "All embeddings have been cleared.",
        })),
        Err(err) => {
            error!(error = %err, "reset failed");
            Json(json!({ "status": "error", "message": err.to_string() }))
        }
    }
}

async fn run_reset(state: &AppState) -> Result<(), RagError> {
    let store = PgVectorStore::connect(&state.settings.database_url()).await?;

    let result = store.reset().await;
    store.close().await;
    result
}

fn server_error(err: RagError) -> (StatusCode, Json<serde_json::Value>) {
    error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": err.to_string() })),
    )
}
