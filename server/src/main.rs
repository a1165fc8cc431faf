use anyhow::Result;
use axum::Router;
use clap::Parser;
use shelfscan_core::StemAlgorithm;
use shelfscan_server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Export file (.json/.jsonl) or directory to serve
    #[arg(long)]
    input: Option<PathBuf>,
    /// JSON object of field -> weight
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Stemming algorithm: porter or snowball
    #[arg(long, default_value = "porter")]
    stemmer: StemAlgorithm,
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        input: args.input,
        weights: args.weights,
        stemmer: args.stemmer,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
