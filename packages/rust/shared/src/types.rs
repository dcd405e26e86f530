//! Wire types for the RAG scraper service endpoints.
//!
//! Three operations, JSON request/response bodies:
//! - `POST /crawl` — crawl a website starting from a URL
//! - `POST /index` — build a vector store over the crawled pages
//! - `POST /ask`   — answer a question against the index
//!
//! Every response carries an optional `error` field. A populated `error`
//! short-circuits normal handling and is surfaced to the user verbatim;
//! all other fields default when absent, because error payloads carry
//! only `error`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel shown when the crawl message carries no parseable elapsed time.
pub const UNKNOWN_TIME: &str = "unknown time";

/// Matches the first parenthesized group in a crawl message,
/// e.g. `Crawling complete (12.3s)` → `12.3s`.
static ELAPSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("elapsed regex"));

// ---------------------------------------------------------------------------
// /crawl
// ---------------------------------------------------------------------------

/// Request body for `POST /crawl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// Root URL to crawl.
    pub url: String,
    /// Maximum number of pages to fetch.
    pub max_pages: u32,
    /// Delay between page fetches, in seconds.
    pub crawl_delay: f64,
}

/// Response body for `POST /crawl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResponse {
    /// Number of pages crawled.
    #[serde(default)]
    pub page_count: usize,
    /// Human-readable completion message; elapsed time is embedded in
    /// parentheses (see [`CrawlResponse::elapsed`]).
    #[serde(default)]
    pub message: String,
    /// URLs of the crawled pages.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Populated when the crawl failed service-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlResponse {
    /// Extract the elapsed-time token from `message`.
    ///
    /// The service reports elapsed time only inside the free-text message,
    /// as the first parenthesized group. Falls back to [`UNKNOWN_TIME`]
    /// when no group is present.
    pub fn elapsed(&self) -> &str {
        ELAPSED_RE
            .captures(&self.message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(UNKNOWN_TIME)
    }
}

// ---------------------------------------------------------------------------
// /index
// ---------------------------------------------------------------------------

/// Request body for `POST /index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Chunk size in characters.
    pub chunk_size: u32,
    /// Overlap between consecutive chunks, in characters.
    pub chunk_overlap: u32,
}

/// Response body for `POST /index`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Number of chunks written to the vector store.
    #[serde(default)]
    pub chunk_count: usize,
    /// Service-side path of the vector store.
    #[serde(default)]
    pub vector_store_path: String,
    /// Human-readable completion message.
    #[serde(default)]
    pub message: String,
    /// Populated when indexing failed service-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// /ask
// ---------------------------------------------------------------------------

/// Request body for `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer.
    pub question: String,
    /// Number of top similar chunks to retrieve.
    pub top_k: u32,
}

/// Response body for `POST /ask`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    /// The generated answer, when one was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Source pages the answer was grounded on, in relevance order.
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Retrieval/answer timing breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
    /// Populated when answering failed service-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A source page backing an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// URL of the source page.
    pub url: String,
    /// Leading excerpt of the matched chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Timing breakdown reported by `/ask`, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timings {
    pub retrieval_time: f64,
    pub answer_time: f64,
    pub total_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_token_extracted() {
        let resp = CrawlResponse {
            message: "Crawling complete (12.3s)".into(),
            ..Default::default()
        };
        assert_eq!(resp.elapsed(), "12.3s");
    }

    #[test]
    fn elapsed_token_first_group_wins() {
        let resp = CrawlResponse {
            message: "done (4.2s) (retry)".into(),
            ..Default::default()
        };
        assert_eq!(resp.elapsed(), "4.2s");
    }

    #[test]
    fn elapsed_token_missing_falls_back() {
        let resp = CrawlResponse {
            message: "Crawling complete".into(),
            ..Default::default()
        };
        assert_eq!(resp.elapsed(), UNKNOWN_TIME);
    }

    #[test]
    fn crawl_request_serializes() {
        let req = CrawlRequest {
            url: "https://example.com".into(),
            max_pages: 5,
            crawl_delay: 1.0,
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["max_pages"], 5);
    }

    #[test]
    fn error_only_payload_decodes() {
        // Failed requests carry nothing but `error`.
        let resp: CrawlResponse =
            serde_json::from_str(r#"{"error": "Crawling failed"}"#).expect("deserialize");
        assert_eq!(resp.error.as_deref(), Some("Crawling failed"));
        assert_eq!(resp.page_count, 0);
        assert!(resp.urls.is_empty());
    }

    #[test]
    fn ask_response_decodes_full_payload() {
        let json = r#"{
            "question": "what is it?",
            "answer": "42",
            "sources": [
                {"url": "http://a", "snippet": "chunk a"},
                {"url": "http://b"}
            ],
            "timings": {"retrieval_time": 0.1, "answer_time": 0.9, "total_time": 1.0}
        }"#;
        let resp: AskResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(resp.answer.as_deref(), Some("42"));
        assert_eq!(resp.sources.len(), 2);
        assert_eq!(resp.sources[0].url, "http://a");
        assert_eq!(resp.sources[1].snippet, None);
        assert!(resp.timings.is_some());
        assert!(resp.error.is_none());
    }

    #[test]
    fn empty_ask_response_decodes() {
        let resp: AskResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(resp.answer.is_none());
        assert!(resp.sources.is_empty());
        assert!(resp.error.is_none());
    }
}
