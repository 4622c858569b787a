//! HTTP page fetcher

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use url::Url;

use crate::api::query::Page;
use crate::api::query::PageRequest;
use crate::error::ApiError;
use crate::error::Error;
use crate::source::PageFetcher;

/// Fetches pages from a REST endpoint over HTTP.
///
/// The endpoint, headers and timeout are passed in explicitly when the
/// client is built. Query parameters, including how the pagination cursor is
/// spelled, come from each [`PageRequest`]. The client is cheap to clone
/// (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::GridClient;
///
/// let client = GridClient::builder()
///     .endpoint("https://api.example.org/materials/")
///     .header("X-API-KEY", "secret")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct GridClient {
    inner: Arc<GridClientInner>,
}

struct GridClientInner {
    endpoint: Url,
    headers: HeaderMap,
    http_client: Client,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for GridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GridClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> GridClientBuilder<Missing> {
        GridClientBuilder::new()
    }

    /// Returns the endpoint queried by this client.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    /// Builds the full URL for a page request.
    pub fn page_url(&self, request: &PageRequest) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(request.to_params());
        url
    }
}

#[async_trait]
impl PageFetcher for GridClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, Error> {
        let url = self.page_url(request);
        log::debug!("GET {}", url);

        let mut builder = self
            .inner
            .http_client
            .get(url)
            .headers(self.inner.headers.clone());
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body).into());
        }
        Ok(Page::from_json(&body)?)
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`GridClient`].
///
/// Uses the typestate pattern so `build` is only available once the
/// endpoint is set.
pub struct GridClientBuilder<Endpoint> {
    endpoint: Endpoint,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl GridClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            endpoint: Missing,
            headers: Vec::new(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the collection endpoint, e.g. `https://api.example.org/materials/`.
    pub fn endpoint(self, endpoint: impl Into<String>) -> GridClientBuilder<Set<String>> {
        GridClientBuilder {
            endpoint: Set(endpoint.into()),
            headers: self.headers,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for GridClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> GridClientBuilder<E> {
    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl GridClientBuilder<Set<String>> {
    /// Builds the [`GridClient`].
    ///
    /// Fails if the endpoint is not an absolute URL or a header is invalid.
    pub fn build(self) -> Result<GridClient, ApiError> {
        let endpoint = Url::parse(&self.endpoint.0)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("header value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(GridClient {
            inner: Arc::new(GridClientInner {
                endpoint,
                headers,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
