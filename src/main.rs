mod config;
mod error;
mod handlers;
mod knowledge;
mod llm;
mod metrics;
mod models;
mod prompt;
mod retriever;
mod server;
mod store;
mod supabase;
mod utils;
mod vector_db;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

/// HTTP backend for the support chat widget.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// FAQ JSON file (overrides KNOWLEDGE_BASE_PATH)
    #[arg(long)]
    knowledge_base: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("faq_chat_server=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_logging();

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = args.knowledge_base {
        config.knowledge_base = path;
    }

    server::serve(config).await
}
