//! CLI command definitions, routing, and tracing setup.

use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use ragdesk_client::{ApiClient, ClientOptions};
use ragdesk_core::{PipelineOutcome, Trigger, TriggerState, UiPort, run_ask, run_crawl_and_index};
use ragdesk_shared::{AppConfig, AskParams, IngestParams, Source, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ragdesk — crawl a website, index it, and ask questions about it.
#[derive(Parser)]
#[command(
    name = "ragdesk",
    version,
    about = "Terminal client for a RAG web-scraper service.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Service base URL (overrides the config file).
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl a website and build the vector store over it.
    Ingest {
        /// Root URL to crawl.
        url: String,

        /// Maximum number of pages to crawl.
        #[arg(long)]
        max_pages: Option<u32>,

        /// Delay between page fetches, in seconds.
        #[arg(long)]
        crawl_delay: Option<f64>,

        /// Chunk size in characters.
        #[arg(long)]
        chunk_size: Option<u32>,

        /// Overlap between consecutive chunks, in characters.
        #[arg(long)]
        chunk_overlap: Option<u32>,
    },

    /// Ask a question against the indexed content.
    Ask {
        /// The question to answer.
        question: String,

        /// Number of top similar chunks to retrieve.
        #[arg(long)]
        top_k: Option<u32>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "ragdesk=info",
        1 => "ragdesk=debug",
        _ => "ragdesk=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Ingest {
            url,
            max_pages,
            crawl_delay,
            chunk_size,
            chunk_overlap,
        } => {
            cmd_ingest(
                &cli,
                url,
                *max_pages,
                *crawl_delay,
                *chunk_size,
                *chunk_overlap,
            )
            .await
        }
        Command::Ask { question, top_k } => cmd_ask(&cli, question, *top_k).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Build the API client from config plus the global `--server` override.
fn build_client(cli: &Cli, config: &AppConfig) -> Result<ApiClient> {
    let base = cli
        .server
        .as_deref()
        .unwrap_or(&config.server.base_url);

    let base_url =
        Url::parse(base).map_err(|e| eyre!("invalid service base URL '{base}': {e}"))?;

    let options = ClientOptions {
        timeout: config.server.timeout_secs.map(Duration::from_secs),
    };

    Ok(ApiClient::new(base_url, &options)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_ingest(
    cli: &Cli,
    url: &str,
    max_pages: Option<u32>,
    crawl_delay: Option<f64>,
    chunk_size: Option<u32>,
    chunk_overlap: Option<u32>,
) -> Result<()> {
    let config = load_config()?;
    let client = build_client(cli, &config)?;

    // Flags override config file values, which override defaults.
    let mut params = IngestParams::from(&config);
    if let Some(v) = max_pages {
        params.max_pages = v;
    }
    if let Some(v) = crawl_delay {
        params.crawl_delay = v;
    }
    if let Some(v) = chunk_size {
        params.chunk_size = v;
    }
    if let Some(v) = chunk_overlap {
        params.chunk_overlap = v;
    }

    info!(url, server = %client.base_url(), "ingesting website");

    let ui = CliUi::new();
    let outcome = run_crawl_and_index(&client, &ui, url, &params).await;
    ui.finish();

    match outcome {
        PipelineOutcome::Completed => {
            println!();
            println!("  {}", ui.status());
            println!();
            Ok(())
        }
        PipelineOutcome::Rejected => Err(eyre!("no URL provided")),
        PipelineOutcome::Failed(_) => Err(eyre!("{}", ui.status())),
    }
}

async fn cmd_ask(cli: &Cli, question: &str, top_k: Option<u32>) -> Result<()> {
    let config = load_config()?;
    let client = build_client(cli, &config)?;

    let mut params = AskParams::from(&config);
    if let Some(v) = top_k {
        params.top_k = v;
    }

    info!(question, server = %client.base_url(), "asking question");

    let ui = CliUi::new();
    let outcome = run_ask(&client, &ui, question, &params).await;
    ui.finish();

    match outcome {
        PipelineOutcome::Completed => {
            let answer = ui.answer().unwrap_or_default();
            println!();
            println!("{answer}");

            let sources = ui.sources();
            if !sources.is_empty() {
                println!();
                println!("Sources:");
                for (i, source) in sources.iter().enumerate() {
                    println!("  {}. {}", i + 1, source.url);
                    if let Some(snippet) = &source.snippet {
                        println!("     {snippet}");
                    }
                }
            }
            println!();
            Ok(())
        }
        PipelineOutcome::Rejected => Err(eyre!("no question provided")),
        PipelineOutcome::Failed(_) => Err(eyre!("{}", ui.answer().unwrap_or_default())),
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI UI port
// ---------------------------------------------------------------------------

/// Terminal implementation of the controller's UI port: an indicatif
/// spinner for live status, captured answer/sources for printing after the
/// pipeline returns. Trigger updates are no-ops — a CLI invocation runs one
/// pipeline per process, so the process itself is the re-entrancy gate.
struct CliUi {
    spinner: ProgressBar,
    status: Mutex<String>,
    answer: Mutex<Option<String>>,
    sources: Mutex<Vec<Source>>,
}

impl CliUi {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self {
            spinner,
            status: Mutex::new(String::new()),
            answer: Mutex::new(None),
            sources: Mutex::new(Vec::new()),
        }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn status(&self) -> String {
        self.status.lock().unwrap().clone()
    }

    fn answer(&self) -> Option<String> {
        self.answer.lock().unwrap().clone()
    }

    fn sources(&self) -> Vec<Source> {
        self.sources.lock().unwrap().clone()
    }
}

impl UiPort for CliUi {
    fn alert(&self, message: &str) {
        self.spinner.suspend(|| eprintln!("{message}"));
    }

    fn set_status(&self, message: &str) {
        *self.status.lock().unwrap() = message.to_string();
        self.spinner.set_message(message.to_string());
    }

    fn append_status(&self, message: &str) {
        let mut status = self.status.lock().unwrap();
        status.push_str(message);
        self.spinner.set_message(status.clone());
    }

    fn set_trigger(&self, _trigger: Trigger, _state: TriggerState) {}

    fn show_answer(&self, text: &str) {
        *self.answer.lock().unwrap() = Some(text.to_string());
        self.spinner.set_message(text.to_string());
    }

    fn clear_sources(&self) {
        self.sources.lock().unwrap().clear();
    }

    fn render_sources(&self, sources: &[Source]) {
        *self.sources.lock().unwrap() = sources.to_vec();
    }
}
