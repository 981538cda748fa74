//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building an HTTP client with browser-like headers and a per-request timeout
//! - Issuing one GET per candidate, never retried
//! - Capturing network failures as a status value instead of an error

use crate::config::HttpConfig;
use crate::harvest::outcome::{FetchStatus, PageFetch, RequestErrorKind};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};

/// Maximum redirect hops followed when redirects are enabled
const MAX_REDIRECTS: usize = 10;

/// Source of page content for the scheduler
///
/// Implementations must never fail past this boundary: every failure is
/// reported through [`PageFetch::status`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL
    async fn fetch(&self, url: &str) -> PageFetch;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use contact_harvest::config::HttpConfig;
/// use contact_harvest::harvest::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));

    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> PageFetch {
        fetch_page(&self.client, url).await
    }
}

/// Fetches a URL once and records status, size and timing
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Code(n)`, body kept |
/// | Other status | `Code(n)`, body dropped |
/// | Timeout | `RequestError(Timeout)` |
/// | Connection refused / DNS / TLS | `RequestError(Connect)` |
/// | Redirect limit exceeded | `RequestError(Redirect)` |
/// | Body read failure | `RequestError(Body)` |
pub async fn fetch_page(client: &Client, url: &str) -> PageFetch {
    let start = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Request to {} failed: {}", url, e);
            return PageFetch::failed(classify_error(&e), start.elapsed());
        }
    };

    let status = response.status();

    match response.bytes().await {
        Ok(bytes) => {
            let body = if status.is_success() {
                Some(String::from_utf8_lossy(&bytes).into_owned())
            } else {
                None
            };

            PageFetch {
                status: FetchStatus::Code(status.as_u16()),
                body,
                bytes_transferred: bytes.len() as u64,
                elapsed: start.elapsed(),
            }
        }
        Err(e) => {
            tracing::debug!("Reading body of {} failed: {}", url, e);
            let kind = if e.is_timeout() {
                RequestErrorKind::Timeout
            } else {
                RequestErrorKind::Body
            };
            PageFetch::failed(kind, start.elapsed())
        }
    }
}

/// Maps a reqwest error onto a failure kind
fn classify_error(error: &reqwest::Error) -> RequestErrorKind {
    if error.is_timeout() {
        RequestErrorKind::Timeout
    } else if error.is_connect() {
        RequestErrorKind::Connect
    } else if error.is_redirect() {
        RequestErrorKind::Redirect
    } else if error.is_body() || error.is_decode() {
        RequestErrorKind::Body
    } else {
        RequestErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_without_redirects() {
        let config = HttpConfig {
            follow_redirects: false,
            ..HttpConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_captured() {
        // Port 9 on localhost is the discard port; nothing listens there in CI
        let client = build_http_client(&HttpConfig {
            request_timeout_secs: 2,
            ..HttpConfig::default()
        })
        .unwrap();

        let fetch = fetch_page(&client, "http://127.0.0.1:9/").await;

        assert!(matches!(fetch.status, FetchStatus::RequestError(_)));
        assert!(fetch.body.is_none());
        assert_eq!(fetch.bytes_transferred, 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_captured() {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        let fetch = fetch_page(&client, "http://").await;
        assert!(matches!(fetch.status, FetchStatus::RequestError(_)));
    }

    #[tokio::test]
    async fn test_default_headers_sent() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "Mozilla/5.0"))
            .and(header("accept", "text/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
        let fetch = fetcher.fetch(&format!("{}/", server.uri())).await;

        assert_eq!(fetch.status, FetchStatus::Code(200));
        assert_eq!(fetch.body.as_deref(), Some("<p>ok</p>"));
    }

    #[tokio::test]
    async fn test_non_success_body_dropped() {
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let fetch = fetch_page(&client, &server.uri()).await;

        assert_eq!(fetch.status, FetchStatus::Code(404));
        assert!(fetch.body.is_none());
    }
}
