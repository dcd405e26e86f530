//! The controller's two seams: the UI it renders into and the backend it
//! calls.

use std::future::Future;

use ragdesk_client::ApiClient;
use ragdesk_shared::{
    AskRequest, AskResponse, CrawlRequest, CrawlResponse, IndexRequest, IndexResponse, Result,
    Source,
};

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// The two interactive controls whose state reflects pipeline progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Starts the crawl+index pipeline.
    Crawl,
    /// Starts the ask pipeline.
    Ask,
}

/// Enabled/label state of a trigger control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    /// Whether activating the trigger may start a pipeline. Front ends must
    /// not start a pipeline whose trigger is disabled; this is the
    /// re-entrancy gate.
    pub enabled: bool,
    /// Label text shown on the control.
    pub label: &'static str,
}

impl TriggerState {
    /// An interactive trigger with the given label.
    pub fn enabled(label: &'static str) -> Self {
        Self {
            enabled: true,
            label,
        }
    }

    /// A disabled trigger with the given label.
    pub fn disabled(label: &'static str) -> Self {
        Self {
            enabled: false,
            label,
        }
    }
}

// ---------------------------------------------------------------------------
// UiPort
// ---------------------------------------------------------------------------

/// Capability set the controller needs from a front end.
///
/// Calls may arrive from a spawned task, so implementations must be
/// thread-safe. A terminal front end typically forwards each call over a
/// channel into its event loop.
pub trait UiPort: Send + Sync {
    /// Blocking input-validation message; the pipeline never started.
    fn alert(&self, message: &str);

    /// Replace the status area's text.
    fn set_status(&self, message: &str);

    /// Append to the status area's text.
    fn append_status(&self, message: &str);

    /// Update a trigger's enabled state and label.
    fn set_trigger(&self, trigger: Trigger, state: TriggerState);

    /// Reveal the answer area and set its text.
    fn show_answer(&self, text: &str);

    /// Clear any previously rendered source list.
    fn clear_sources(&self);

    /// Render the source list, preserving order.
    fn render_sources(&self, sources: &[Source]);
}

// ---------------------------------------------------------------------------
// RagBackend
// ---------------------------------------------------------------------------

/// The three service operations the controller sequences.
///
/// Implemented by [`ApiClient`]; tests substitute a scripted stub.
pub trait RagBackend: Send + Sync {
    /// `POST /crawl`.
    fn crawl(&self, req: &CrawlRequest) -> impl Future<Output = Result<CrawlResponse>> + Send;

    /// `POST /index`.
    fn build_index(
        &self,
        req: &IndexRequest,
    ) -> impl Future<Output = Result<IndexResponse>> + Send;

    /// `POST /ask`.
    fn ask(&self, req: &AskRequest) -> impl Future<Output = Result<AskResponse>> + Send;
}

impl RagBackend for ApiClient {
    async fn crawl(&self, req: &CrawlRequest) -> Result<CrawlResponse> {
        ApiClient::crawl(self, req).await
    }

    async fn build_index(&self, req: &IndexRequest) -> Result<IndexResponse> {
        ApiClient::build_index(self, req).await
    }

    async fn ask(&self, req: &AskRequest) -> Result<AskResponse> {
        ApiClient::ask(self, req).await
    }
}
