//! Shared types, error model, and configuration for ragdesk.
//!
//! This crate is the foundation depended on by all other ragdesk crates.
//! It provides:
//! - [`RagdeskError`] — the unified error type
//! - Wire types for the service endpoints ([`CrawlRequest`], [`AskResponse`], ...)
//! - Configuration ([`AppConfig`], [`IngestParams`], [`AskParams`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AskDefaultsConfig, AskParams, CrawlDefaultsConfig, IndexDefaultsConfig,
    IngestParams, ServerConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{RagdeskError, Result};
pub use types::{
    AskRequest, AskResponse, CrawlRequest, CrawlResponse, IndexRequest, IndexResponse, Source,
    Timings, UNKNOWN_TIME,
};
