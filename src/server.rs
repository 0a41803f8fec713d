use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::handlers;
use crate::knowledge;
use crate::llm::{GeminiClient, LanguageModel};
use crate::retriever::Retriever;
use crate::store::{ConversationStore, MemoryStore};
use crate::supabase::SupabaseStore;

/// Everything a request needs, built once at startup and never mutated.
#[derive(Clone)]
pub struct AppContext {
    pub retriever: Arc<Retriever>,
    pub model: Arc<dyn LanguageModel>,
    pub store: Arc<dyn ConversationStore>,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        let faqs = knowledge::load_faqs(&config.knowledge_base)
            .context("failed to load knowledge base")?;
        let retriever = Retriever::new(faqs);
        info!(
            faqs = retriever.faq_count(),
            vocabulary = retriever.vocabulary_size(),
            "indexed knowledge base"
        );

        let store: Arc<dyn ConversationStore> = match &config.store {
            StoreBackend::Supabase { url, key } => {
                info!(%url, "using supabase store");
                Arc::new(SupabaseStore::new(url, key.clone()))
            }
            StoreBackend::Memory => {
                info!("using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let model = GeminiClient::new(config.llm.clone());
        info!(model = model.model(), "configured language model");

        Ok(AppContext {
            retriever: Arc::new(retriever),
            model: Arc::new(model),
            store,
        })
    }
}

pub fn router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(handlers::login))
        .route("/chat", post(handlers::chat))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}

pub async fn serve(config: Config) -> Result<()> {
    let ctx = AppContext::from_config(&config)?;
    let app = router(ctx);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("server error")
}
