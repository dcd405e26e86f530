//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic.

mod ask;
mod ingest;

use std::fmt;

pub(crate) use ask::AskScreen;
pub(crate) use ingest::IngestScreen;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Ingest,
    Ask,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingest => write!(f, "Ingest"),
            Self::Ask => write!(f, "Ask"),
        }
    }
}

/// An intent a screen hands back to the app for dispatch.
///
/// Screens only emit a start intent when the corresponding trigger is
/// enabled, so a pipeline already in flight cannot be started again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScreenAction {
    /// Start the crawl+index pipeline with the given URL input.
    StartIngest(String),
    /// Start the ask pipeline with the given question input.
    StartAsk(String),
}
