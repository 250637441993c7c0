use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use wikisearch_core::RankingParams;
use wikisearch_server::{build_app, ServerConfig};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, env = "WIKISEARCH_INDEX", default_value = "./index")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Per-query time limit in milliseconds
    #[arg(long, default_value_t = 30_000)]
    query_timeout_ms: u64,
    /// Corpus size used for idf; read from meta.json when omitted
    #[arg(long)]
    num_docs: Option<u64>,
    /// Body candidates kept before the title rerank
    #[arg(long, default_value_t = RankingParams::default().candidate_limit)]
    candidate_limit: usize,
    /// Results returned by /search and /search_body
    #[arg(long, default_value_t = RankingParams::default().result_limit)]
    result_limit: usize,
    /// Score multiplier per matched query term
    #[arg(long, default_value_t = RankingParams::default().coverage_boost)]
    coverage_boost: f64,
    /// Score multiplier per query term found in the title
    #[arg(long, default_value_t = RankingParams::default().title_boost)]
    title_boost: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = ServerConfig::new(&args.index);
    config.num_docs = args.num_docs;
    config.query_timeout = Duration::from_millis(args.query_timeout_ms);
    config.ranking = RankingParams {
        candidate_limit: args.candidate_limit,
        result_limit: args.result_limit,
        coverage_boost: args.coverage_boost,
        title_boost: args.title_boost,
        ..RankingParams::default()
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
