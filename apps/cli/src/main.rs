//! ragdesk CLI — terminal client for a RAG web-scraper service.
//!
//! Sequences the service's crawl → index pipeline and asks questions
//! against the resulting vector store.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
