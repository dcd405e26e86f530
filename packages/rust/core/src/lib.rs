//! Workflow controller for the RAG scraper service.
//!
//! Drives two user-triggered pipelines against the service:
//! - **crawl+index**: two sequential calls, the second issued only after the
//!   first resolves without an error
//! - **ask**: a single call
//!
//! Both keep the interactive controls in sync through a [`UiPort`]: disable
//! the relevant triggers on entry, render progress and results into the
//! status/answer areas, and unconditionally restore the triggers on every
//! exit path. Front ends (CLI, TUI) implement [`UiPort`]; the service is
//! reached through [`RagBackend`], implemented by `ragdesk_client::ApiClient`
//! and stubbed in tests.

pub mod pipeline;
pub mod ports;

pub use pipeline::{PipelineOutcome, labels, messages, run_ask, run_crawl_and_index};
pub use ports::{RagBackend, Trigger, TriggerState, UiPort};
