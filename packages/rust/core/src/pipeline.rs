//! The two user-triggered pipelines: crawl+index and ask.
//!
//! Each pipeline is a linear chain of awaited calls. Within crawl+index the
//! index call is never issued unless the crawl call resolved without an
//! error. No retries, no controller-level timeout, no cancellation; once a
//! call is issued it runs to completion or failure. Trigger restoration runs
//! on every exit path past input validation, so no outcome leaves a control
//! disabled.

use tracing::{debug, info, instrument, warn};

use ragdesk_shared::{AskRequest, CrawlRequest, IndexRequest};
use ragdesk_shared::{AskParams, IngestParams};

use crate::ports::{RagBackend, Trigger, TriggerState, UiPort};

/// Trigger label text, idle and in-progress.
pub mod labels {
    pub const CRAWL_IDLE: &str = "Crawl Website";
    pub const CRAWLING: &str = "Crawling...";
    pub const INDEXING: &str = "Indexing...";
    pub const ASK_IDLE: &str = "Ask";
    pub const GENERATING: &str = "Generating...";
}

/// Fixed user-facing messages.
pub mod messages {
    pub const URL_REQUIRED: &str = "Please enter a website URL!";
    pub const QUESTION_REQUIRED: &str = "Please enter a question!";
    pub const CRAWL_STARTING: &str = "Starting crawl process...";
    pub const INDEX_STARTING: &str = " Now creating vector store...";
    pub const ANSWER_PLACEHOLDER: &str = "Generating answer...";
    pub const NO_ANSWER: &str = "No answer found in crawled content.";
    pub const CONNECT_FAILED: &str = "Failed to connect to server.";
}

/// Terminal outcome of a pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every step resolved without an error.
    Completed,
    /// Input validation failed; no network call was issued.
    Rejected,
    /// A step reported an error (service-side or transport); the message
    /// was already rendered through the UI port.
    Failed(String),
}

impl PipelineOutcome {
    /// Whether the invocation did not complete normally.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Pipeline A: crawl + index
// ---------------------------------------------------------------------------

/// Run the crawl+index pipeline.
///
/// Trims the URL and rejects empty input with an alert before touching the
/// network. While running, both triggers are disabled: the crawl trigger
/// because it is busy, the ask trigger so a question cannot race a
/// not-yet-ready index.
#[instrument(skip_all, fields(url = url_input.trim()))]
pub async fn run_crawl_and_index<B: RagBackend, U: UiPort>(
    backend: &B,
    ui: &U,
    url_input: &str,
    params: &IngestParams,
) -> PipelineOutcome {
    let url = url_input.trim();
    if url.is_empty() {
        ui.alert(messages::URL_REQUIRED);
        return PipelineOutcome::Rejected;
    }

    ui.set_trigger(Trigger::Crawl, TriggerState::disabled(labels::CRAWLING));
    ui.set_trigger(Trigger::Ask, TriggerState::disabled(labels::ASK_IDLE));
    ui.set_status(messages::CRAWL_STARTING);

    let outcome = crawl_then_index(backend, ui, url, params).await;

    // Finalization: runs whatever branch the pipeline took.
    ui.set_trigger(Trigger::Crawl, TriggerState::enabled(labels::CRAWL_IDLE));
    ui.set_trigger(Trigger::Ask, TriggerState::enabled(labels::ASK_IDLE));

    outcome
}

async fn crawl_then_index<B: RagBackend, U: UiPort>(
    backend: &B,
    ui: &U,
    url: &str,
    params: &IngestParams,
) -> PipelineOutcome {
    // Step 1: crawl.
    let crawl_req = CrawlRequest {
        url: url.to_string(),
        max_pages: params.max_pages,
        crawl_delay: params.crawl_delay,
    };

    let crawl_resp = match backend.crawl(&crawl_req).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "crawl request failed");
            ui.set_status(&format!("Error: {e}"));
            return PipelineOutcome::Failed(e.to_string());
        }
    };

    if let Some(error) = crawl_resp.error {
        warn!(%error, "crawl reported an error");
        ui.set_status(&format!("Error: {error}"));
        return PipelineOutcome::Failed(error);
    }

    info!(
        page_count = crawl_resp.page_count,
        elapsed = crawl_resp.elapsed(),
        "crawl complete"
    );
    ui.set_status(&format!(
        "Crawl complete. {} pages crawled in {}.",
        crawl_resp.page_count,
        crawl_resp.elapsed()
    ));

    // Step 2: index. Only reached when the crawl resolved without an error.
    ui.set_trigger(Trigger::Crawl, TriggerState::disabled(labels::INDEXING));
    ui.append_status(messages::INDEX_STARTING);

    let index_req = IndexRequest {
        chunk_size: params.chunk_size,
        chunk_overlap: params.chunk_overlap,
    };

    let index_resp = match backend.build_index(&index_req).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "index request failed");
            ui.set_status(&format!("Error: {e}"));
            return PipelineOutcome::Failed(e.to_string());
        }
    };

    if let Some(error) = index_resp.error {
        warn!(%error, "indexing reported an error");
        ui.set_status(&format!("Error: {error}"));
        return PipelineOutcome::Failed(error);
    }

    info!(
        chunk_count = index_resp.chunk_count,
        vector_store_path = %index_resp.vector_store_path,
        "indexing complete"
    );
    debug!(vector_store_path = %index_resp.vector_store_path, "vector store ready");
    ui.set_status(&format!(
        "Indexing complete. {} chunks created. You can now ask a question.",
        index_resp.chunk_count
    ));

    PipelineOutcome::Completed
}

// ---------------------------------------------------------------------------
// Pipeline B: ask
// ---------------------------------------------------------------------------

/// Run the ask pipeline.
///
/// Trims the question and rejects empty input with an alert before touching
/// the network. Only the ask trigger is disabled for the call's duration.
/// A service-side `error` is rendered in the answer area as a normal
/// terminal branch, not propagated as a failure of the transport.
#[instrument(skip_all)]
pub async fn run_ask<B: RagBackend, U: UiPort>(
    backend: &B,
    ui: &U,
    question_input: &str,
    params: &AskParams,
) -> PipelineOutcome {
    let question = question_input.trim();
    if question.is_empty() {
        ui.alert(messages::QUESTION_REQUIRED);
        return PipelineOutcome::Rejected;
    }

    ui.set_trigger(Trigger::Ask, TriggerState::disabled(labels::GENERATING));
    ui.show_answer(messages::ANSWER_PLACEHOLDER);
    ui.clear_sources();

    let ask_req = AskRequest {
        question: question.to_string(),
        top_k: params.top_k,
    };

    let outcome = match backend.ask(&ask_req).await {
        Err(e) => {
            warn!(error = %e, "ask request failed");
            ui.show_answer(messages::CONNECT_FAILED);
            PipelineOutcome::Failed(e.to_string())
        }
        Ok(resp) => {
            if let Some(error) = resp.error {
                warn!(%error, "ask reported an error");
                ui.show_answer(&format!("Error: {error}"));
                PipelineOutcome::Failed(error)
            } else if let Some(answer) = resp.answer {
                info!(sources = resp.sources.len(), "answer received");
                ui.show_answer(&answer);
                ui.render_sources(&resp.sources);
                PipelineOutcome::Completed
            } else {
                info!("no answer in response");
                ui.show_answer(messages::NO_ANSWER);
                PipelineOutcome::Completed
            }
        }
    };

    ui.set_trigger(Trigger::Ask, TriggerState::enabled(labels::ASK_IDLE));

    outcome
}
