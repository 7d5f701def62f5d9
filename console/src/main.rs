//! Console client for the SQL middleware.
//!
//! Posts a database name and SQL text to the server and renders the
//! response as an HTML document: a table for JSON results, the raw text
//! otherwise.

mod client;
mod page;
mod render;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::QueryClient;

#[derive(Parser)]
#[command(name = "gestor-console", about = "Runs SQL through the middleware and renders the result")]
struct Cli {
    /// Provider name (mysql, sqlite, anything else is postgres)
    db: String,

    /// SQL statement to execute
    sql: String,

    /// Base URL of the middleware server
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,

    /// Write the result document here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = QueryClient::new(cli.server.clone());
    let view = client.run_query(&cli.db, &cli.sql).await;
    tracing::info!(message = %view.message, "query finished");

    let document = page::render_page(&cli.db, &cli.sql, &view);
    match &cli.out {
        Some(path) => std::fs::write(path, document)?,
        None => println!("{document}"),
    }

    Ok(())
}
