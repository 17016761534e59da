mod chat;
mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;
mod store;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::ChatRegistry;
use crate::config::Config;
use crate::db::create_pool;
use crate::interview::service::InterviewService;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryUserStore, PgUserStore, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize record storage
    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => Arc::new(PgUserStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; candidate records are kept in memory only");
            Arc::new(MemoryUserStore::new())
        }
    };

    // Initialize language model client
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_url.clone(),
        config.llm_timeout_secs.map(Duration::from_secs),
    )?;
    let interview = InterviewService::new(Arc::new(gemini));
    info!("LLM client initialized (model: {})", interview.model_name());

    let chats = ChatRegistry::new();
    chats.spawn_idle_sweeper(Duration::from_secs(config.chat_idle_timeout_secs));

    let state = AppState {
        store,
        interview,
        chats,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
