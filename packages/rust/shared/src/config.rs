//! Application configuration for ragdesk.
//!
//! User config lives at `~/.ragdesk/ragdesk.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RagdeskError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ragdesk.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ragdesk";

// ---------------------------------------------------------------------------
// Config structs (matching ragdesk.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service endpoint settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Crawl parameter defaults.
    #[serde(default)]
    pub crawl: CrawlDefaultsConfig,

    /// Index parameter defaults.
    #[serde(default)]
    pub index: IndexDefaultsConfig,

    /// Ask parameter defaults.
    #[serde(default)]
    pub ask: AskDefaultsConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the RAG scraper service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout in seconds. Unset means the transport's
    /// defaults apply; crawl and index calls can run for minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlDefaultsConfig {
    /// Maximum number of pages to crawl.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay between page fetches, in seconds.
    #[serde(default = "default_crawl_delay")]
    pub crawl_delay: f64,
}

impl Default for CrawlDefaultsConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            crawl_delay: default_crawl_delay(),
        }
    }
}

fn default_max_pages() -> u32 {
    5
}
fn default_crawl_delay() -> f64 {
    1.0
}

/// `[index]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefaultsConfig {
    /// Chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Overlap between consecutive chunks, in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,
}

impl Default for IndexDefaultsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> u32 {
    800
}
fn default_chunk_overlap() -> u32 {
    100
}

/// `[ask]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskDefaultsConfig {
    /// Number of top similar chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl Default for AskDefaultsConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// Runtime params (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime parameters for the crawl+index pipeline.
#[derive(Debug, Clone)]
pub struct IngestParams {
    /// Maximum number of pages to crawl.
    pub max_pages: u32,
    /// Delay between page fetches, in seconds.
    pub crawl_delay: f64,
    /// Chunk size in characters.
    pub chunk_size: u32,
    /// Overlap between consecutive chunks, in characters.
    pub chunk_overlap: u32,
}

impl From<&AppConfig> for IngestParams {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_pages: config.crawl.max_pages,
            crawl_delay: config.crawl.crawl_delay,
            chunk_size: config.index.chunk_size,
            chunk_overlap: config.index.chunk_overlap,
        }
    }
}

/// Runtime parameters for the ask pipeline.
#[derive(Debug, Clone)]
pub struct AskParams {
    /// Number of top similar chunks to retrieve.
    pub top_k: u32,
}

impl From<&AppConfig> for AskParams {
    fn from(config: &AppConfig) -> Self {
        Self {
            top_k: config.ask.top_k,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ragdesk/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RagdeskError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ragdesk/ragdesk.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RagdeskError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RagdeskError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| RagdeskError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RagdeskError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RagdeskError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("chunk_size"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(parsed.crawl.max_pages, 5);
        assert_eq!(parsed.ask.top_k, 3);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[server]
base_url = "http://rag.internal:8080"
timeout_secs = 120

[index]
chunk_size = 1200
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.server.base_url, "http://rag.internal:8080");
        assert_eq!(config.server.timeout_secs, Some(120));
        assert_eq!(config.index.chunk_size, 1200);
        // Untouched sections keep their defaults
        assert_eq!(config.index.chunk_overlap, 100);
        assert_eq!(config.crawl.crawl_delay, 1.0);
    }

    #[test]
    fn ingest_params_from_app_config() {
        let app = AppConfig::default();
        let params = IngestParams::from(&app);
        assert_eq!(params.max_pages, 5);
        assert_eq!(params.crawl_delay, 1.0);
        assert_eq!(params.chunk_size, 800);
        assert_eq!(params.chunk_overlap, 100);
    }

    #[test]
    fn ask_params_from_app_config() {
        let app = AppConfig::default();
        let params = AskParams::from(&app);
        assert_eq!(params.top_k, 3);
    }
}
