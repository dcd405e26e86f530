//! HTTP client for the RAG scraper service.
//!
//! Thin typed wrapper over the three service endpoints:
//! `POST /crawl`, `POST /index`, and `POST /ask`.
//!
//! The service reports application-level failures as an `error` field in the
//! JSON body, usually alongside a 4xx/5xx status. The client therefore
//! decodes the body regardless of status and leaves the `error` check to the
//! caller; only connection failures and undecodable bodies become errors
//! here.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use ragdesk_shared::{
    AskRequest, AskResponse, CrawlRequest, CrawlResponse, IndexRequest, IndexResponse,
    RagdeskError, Result,
};

/// User-Agent string for service requests.
const USER_AGENT: &str = concat!("ragdesk/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Client options
// ---------------------------------------------------------------------------

/// Construction options for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Optional request timeout. `None` leaves the transport's defaults in
    /// place; crawl and index calls can legitimately run for minutes.
    pub timeout: Option<Duration>,
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Typed client for the RAG scraper service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client against the given service base URL.
    pub fn new(base_url: Url, options: &ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| RagdeskError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// The service base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Crawl a website starting from the URL in the request.
    #[instrument(skip(self), fields(url = %req.url, max_pages = req.max_pages))]
    pub async fn crawl(&self, req: &CrawlRequest) -> Result<CrawlResponse> {
        self.post_json("/crawl", req).await
    }

    /// Build the vector store over the most recent crawl.
    #[instrument(skip(self), fields(chunk_size = req.chunk_size))]
    pub async fn build_index(&self, req: &IndexRequest) -> Result<IndexResponse> {
        self.post_json("/index", req).await
    }

    /// Answer a question against the vector store.
    #[instrument(skip(self), fields(top_k = req.top_k))]
    pub async fn ask(&self, req: &AskRequest) -> Result<AskResponse> {
        let resp: AskResponse = self.post_json("/ask", req).await?;

        if let Some(t) = &resp.timings {
            debug!(
                retrieval_time = t.retrieval_time,
                answer_time = t.answer_time,
                total_time = t.total_time,
                "ask timings"
            );
        }

        Ok(resp)
    }

    /// POST a JSON body and decode the JSON response, ignoring the HTTP
    /// status. Callers inspect the decoded `error` field instead.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RagdeskError::validation(format!("bad endpoint path {path}: {e}")))?;

        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| RagdeskError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        debug!(%url, %status, "service responded");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RagdeskError::Network(format!("{url}: failed to read body: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| RagdeskError::Decode(format!("{url}: HTTP {status}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let base = Url::parse(&server.uri()).unwrap();
        ApiClient::new(base, &ClientOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn crawl_posts_body_and_decodes() {
        let server = MockServer::start().await;

        let req = CrawlRequest {
            url: "https://example.com".into(),
            max_pages: 5,
            crawl_delay: 1.0,
        };

        Mock::given(method("POST"))
            .and(path("/crawl"))
            .and(body_json(&req))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Crawling complete (2.5s)",
                "page_count": 5,
                "urls": ["https://example.com", "https://example.com/about"]
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server).crawl(&req).await.unwrap();
        assert_eq!(resp.page_count, 5);
        assert_eq!(resp.elapsed(), "2.5s");
        assert_eq!(resp.urls.len(), 2);
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn error_body_with_500_status_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/crawl"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "Crawling failed"})),
            )
            .mount(&server)
            .await;

        let req = CrawlRequest {
            url: "https://example.com".into(),
            max_pages: 5,
            crawl_delay: 1.0,
        };

        // Non-success status is not a transport error: the body decodes and
        // the error field carries the failure.
        let resp = client_for(&server).crawl(&req).await.unwrap();
        assert_eq!(resp.error.as_deref(), Some("Crawling failed"));
    }

    #[tokio::test]
    async fn index_decodes_counts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Indexing complete 1.2s",
                "chunk_count": 42,
                "vector_store_path": "data/faiss_index"
            })))
            .mount(&server)
            .await;

        let req = IndexRequest {
            chunk_size: 800,
            chunk_overlap: 100,
        };
        let resp = client_for(&server).build_index(&req).await.unwrap();
        assert_eq!(resp.chunk_count, 42);
        assert_eq!(resp.vector_store_path, "data/faiss_index");
    }

    #[tokio::test]
    async fn ask_decodes_answer_and_sources() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "question": "what is it?",
                "answer": "42",
                "sources": [
                    {"url": "http://a", "snippet": "chunk a"},
                    {"url": "http://b", "snippet": "chunk b"}
                ],
                "timings": {"retrieval_time": 0.1, "answer_time": 0.9, "total_time": 1.0}
            })))
            .mount(&server)
            .await;

        let req = AskRequest {
            question: "what is it?".into(),
            top_k: 3,
        };
        let resp = client_for(&server).ask(&req).await.unwrap();
        assert_eq!(resp.answer.as_deref(), Some("42"));
        assert_eq!(resp.sources[0].url, "http://a");
        assert_eq!(resp.sources[1].url, "http://b");
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let req = AskRequest {
            question: "q".into(),
            top_k: 3,
        };
        let err = client_for(&server).ask(&req).await.unwrap_err();
        assert!(matches!(err, RagdeskError::Decode(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Port 1 is never listening.
        let base = Url::parse("http://127.0.0.1:1").unwrap();
        let client = ApiClient::new(base, &ClientOptions::default()).unwrap();

        let req = AskRequest {
            question: "q".into(),
            top_k: 3,
        };
        let err = client.ask(&req).await.unwrap_err();
        assert!(matches!(err, RagdeskError::Network(_)));
    }
}
