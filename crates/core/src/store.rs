//! Store clients: the HTTP client for the Billed API, and an in-process
//! store used by demo mode and tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use billed_common::constants::BILLS_RESOURCE;
use billed_common::error::{StoreError, StoreResult};
use billed_common::traits::{BillsResource, Store};
use billed_common::types::RawBill;
use billed_types::config::AppConfig;
use billed_types::session::UserSession;

// ─── HTTP store ─────────────────────────────────────────────────────

/// Client for the Billed REST API.
pub struct HttpStore {
    bills: HttpBills,
}

struct HttpBills {
    http: reqwest::Client,
    url: Url,
    jwt: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration, jwt: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let url = resource_url(base_url, BILLS_RESOURCE)
            .with_context(|| format!("Invalid store URL: {base_url}"))?;

        Ok(Self {
            bills: HttpBills { http, url, jwt },
        })
    }

    /// Create from config, authenticating with the session token if any.
    pub fn from_config(config: &AppConfig, session: Option<&UserSession>) -> Result<Self> {
        Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
            session.and_then(|s| s.jwt.clone()),
        )
    }
}

impl Store for HttpStore {
    fn bills(&self) -> &dyn BillsResource {
        &self.bills
    }
}

#[async_trait]
impl BillsResource for HttpBills {
    async fn list(&self) -> StoreResult<Vec<RawBill>> {
        debug!(url = %self.url, "listing bills");
        let mut request = self.http.get(self.url.clone());
        if let Some(jwt) = &self.jwt {
            request = request.bearer_auth(jwt);
        }

        // Messages are classified by status substring, so keep URLs (and
        // their port numbers) out of them.
        let resp = request
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Store unreachable: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::from_status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| StoreError::new(format!("Store unreachable: {}", e.without_url())))?;

        serde_json::from_slice::<Vec<RawBill>>(&body).map_err(|e| {
            debug!(error = %e, bytes = body.len(), "undecodable bills payload");
            StoreError::new(format!("Malformed store response: {}", decode_cause(&e)))
        })
    }
}

/// The serde message without its `at line L column C` suffix. Positions are
/// digits, and digits in a store message read as a status code.
fn decode_cause(e: &serde_json::Error) -> String {
    let msg = e.to_string();
    match msg.rfind(" at line ") {
        Some(idx) => msg[..idx].to_string(),
        None => msg,
    }
}

/// Join a resource name onto the API base, keeping any base path.
pub fn resource_url(base_url: &str, resource: &str) -> Result<Url, url::ParseError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)?.join(resource)
}

// ─── In-memory store ────────────────────────────────────────────────

/// A store answering from memory: either a fixed list or a fixed failure.
pub struct MemoryStore {
    bills: MemoryBills,
}

struct MemoryBills {
    result: StoreResult<Vec<RawBill>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_bills(bills: Vec<RawBill>) -> Self {
        Self::from_result(Ok(bills))
    }

    /// A store whose `list()` always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_result(Err(StoreError::new(message)))
    }

    fn from_result(result: StoreResult<Vec<RawBill>>) -> Self {
        Self {
            bills: MemoryBills {
                result,
                calls: AtomicUsize::new(0),
            },
        }
    }

    /// How many times `list()` was called.
    pub fn list_calls(&self) -> usize {
        self.bills.calls.load(Ordering::SeqCst)
    }
}

impl Store for MemoryStore {
    fn bills(&self) -> &dyn BillsResource {
        &self.bills
    }
}

#[async_trait]
impl BillsResource for MemoryBills {
    async fn list(&self) -> StoreResult<Vec<RawBill>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billed_common::error::TransportErrorKind;

    #[test]
    fn test_resource_url_root() {
        let url = resource_url("http://localhost:5678", "bills").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5678/bills");
    }

    #[test]
    fn test_resource_url_keeps_base_path() {
        let url = resource_url("https://api.billed.tld/v1", "bills").unwrap();
        assert_eq!(url.as_str(), "https://api.billed.tld/v1/bills");
        let url = resource_url("https://api.billed.tld/v1/", "bills").unwrap();
        assert_eq!(url.as_str(), "https://api.billed.tld/v1/bills");
    }

    #[test]
    fn test_resource_url_invalid() {
        assert!(resource_url("not a url", "bills").is_err());
    }

    #[test]
    fn test_http_store_from_config() {
        let config = AppConfig::default();
        let session = UserSession::employee("a@a").with_jwt("t0k");
        let store = HttpStore::from_config(&config, Some(&session)).unwrap();
        assert_eq!(store.bills.jwt.as_deref(), Some("t0k"));
        assert!(store.bills.url.as_str().ends_with("/bills"));
    }

    #[tokio::test]
    async fn test_http_store_unreachable_is_unknown_kind() {
        // Port 9 (discard) on localhost is closed on CI machines.
        let store = HttpStore::new("http://127.0.0.1:9", Duration::from_secs(2), None).unwrap();
        let err = store.bills().list().await.unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::Unknown);
        assert!(err.message().starts_with("Store unreachable"));
    }

    /// Serve one canned HTTP response on a free local port; returns the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn list_from(status: &'static str, body: &'static str) -> StoreResult<Vec<RawBill>> {
        let base = serve_once(status, body).await;
        let store = HttpStore::new(&base, Duration::from_secs(5), None).unwrap();
        store.bills().list().await
    }

    #[tokio::test]
    async fn test_http_store_lists_bills() {
        let bills = list_from(
            "200 OK",
            r#"[{"id":"47qAXb6fIm2zOKkLzMro","date":"2004-04-04","status":"pending","amount":400}]"#,
        )
        .await
        .unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].id, "47qAXb6fIm2zOKkLzMro");
    }

    #[tokio::test]
    async fn test_http_store_404_is_not_found() {
        let err = list_from("404 Not Found", "").await.unwrap_err();
        assert_eq!(err.message(), "Erreur 404");
        assert_eq!(err.kind(), TransportErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_http_store_500_is_server_error() {
        let err = list_from("500 Internal Server Error", "").await.unwrap_err();
        assert_eq!(err.message(), "Erreur 500");
        assert_eq!(err.kind(), TransportErrorKind::ServerError);
    }

    #[tokio::test]
    async fn test_http_store_non_json_body_is_malformed() {
        let err = list_from("200 OK", "<html>oops</html>").await.unwrap_err();
        assert!(err.message().starts_with("Malformed store response"));
        assert_eq!(err.kind(), TransportErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_http_store_decode_error_names_the_cause() {
        let err = list_from("200 OK", r#"[{"date":"2004-04-04","status":"pending"}]"#)
            .await
            .unwrap_err();
        assert!(err.message().contains("missing field `id`"), "{}", err.message());
        assert!(!err.message().contains("at line"));
        assert_eq!(err.kind(), TransportErrorKind::Unknown);
    }

    #[test]
    fn test_decode_cause_strips_position() {
        let e = serde_json::from_str::<Vec<RawBill>>("[{]").unwrap_err();
        assert!(!decode_cause(&e).contains("line"));
    }

    #[tokio::test]
    async fn test_memory_store_counts_calls() {
        let store = MemoryStore::with_bills(vec![RawBill::new("a", "2004-04-04", "pending")]);
        assert_eq!(store.bills().list().await.unwrap().len(), 1);
        assert_eq!(store.bills().list().await.unwrap().len(), 1);
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_failing() {
        let store = MemoryStore::failing("Erreur 500");
        let err = store.bills().list().await.unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::ServerError);
    }
}
