use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reality_auditor::audit::Engine;
use reality_auditor::cache::AuditCache;
use reality_auditor::llm::openai::LlmClient;
use reality_auditor::serper::{Searcher, Serper};
use reality_auditor::server::run_server;

#[derive(Parser)]
#[command(name = "reality-auditor", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// LLM model used for audits
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
    /// Max concurrent LLM calls
    #[arg(long, default_value_t = 8)]
    llm_concurrency: usize,
    /// Max concurrent citation searches
    #[arg(long, default_value_t = 4)]
    search_concurrency: usize,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the HTTP server exposing POST /audit
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Audit a single article from a text file and print the result JSON
    Audit {
        #[arg(long)]
        input_file: String,
        /// URL the article was fetched from, labeled as the original source
        #[arg(long)]
        url: Option<String>,
    },
}

fn build_engine(cli: &Cli) -> Result<Engine> {
    let llm = LlmClient::new(
        cli.model.clone(),
        std::env::var("OPENAI_BASE_URL").ok(),
        std::env::var("OPENAI_API_KEY").ok(),
        cli.llm_concurrency,
    );
    let searcher: Option<Arc<dyn Searcher>> = match std::env::var("SERPER_API_KEY") {
        Ok(key) => Some(Arc::new(Serper::new(key, 5, 5, 10_000)?)),
        Err(_) => None,
    };
    Ok(Engine {
        llm: Arc::new(llm),
        searcher,
        cache: Arc::new(AuditCache::new(None)),
        search_concurrency: cli.search_concurrency,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let engine = build_engine(&cli)?;

    match &cli.cmd {
        Cmd::Serve { addr } => run_server(engine, addr).await?,
        Cmd::Audit { input_file, url } => {
            let content = tokio::fs::read_to_string(input_file).await?;
            let record = engine.audit(&content, url.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
