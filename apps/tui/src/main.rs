//! ragdesk TUI — interactive terminal client for the RAG scraper service.
//!
//! Provides an Ingest screen (crawl + index a website) and an Ask screen
//! (question, answer, source links), built with `ratatui` + `crossterm`.
//! Pipelines run on spawned tasks and report back over a channel.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    app::run()
}
