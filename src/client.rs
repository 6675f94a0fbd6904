//! Fetches expense summaries from the expense API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::{Error, period::Period, summary::ExpenseSummary};

/// The path segments of the expense API summary route, before the period token.
pub const EXPENSES_API_SEGMENTS: [&str; 3] = ["api", "v1.0", "expenses"];

/// The default time to wait for the expense API before giving up.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can provide the expense summary for a period.
///
/// Each call is one request. Implementations do not retry.
pub trait SummarySource {
    /// Get the validated expense summary for `period`.
    fn fetch_summary(
        &self,
        period: &Period,
    ) -> impl Future<Output = Result<ExpenseSummary, Error>> + Send;
}

/// Settings for talking to the expense API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// The base URL of the expense API, e.g. "https://budget.example.com".
    pub api_base_url: String,
    /// How long to wait for a response.
    pub request_timeout: Duration,
}

impl SourceConfig {
    /// Create a config with the default request timeout.
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Fetches expense summaries over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSummarySource {
    http: Client,
    base_url: Url,
}

impl HttpSummarySource {
    /// Create a source for the expense API described by `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidApiBaseUrl] if the base URL is not an absolute
    /// HTTP(S) URL, or [Error::Network] if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|_| Error::InvalidApiBaseUrl(config.api_base_url.clone()))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(Error::InvalidApiBaseUrl(config.api_base_url.clone()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .inspect_err(|error| tracing::error!("Could not build HTTP client: {error}"))?;

        Ok(Self { http, base_url })
    }

    /// The URL of the summary for `period`.
    ///
    /// The period token is percent-encoded as a single path segment.
    pub fn summary_url(&self, period: &Period) -> Result<Url, Error> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| Error::InvalidApiBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(EXPENSES_API_SEGMENTS)
            .push(period.token());

        Ok(url)
    }
}

impl SummarySource for HttpSummarySource {
    async fn fetch_summary(&self, period: &Period) -> Result<ExpenseSummary, Error> {
        let url = self.summary_url(period)?;
        tracing::debug!("Requesting the expense summary from {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .inspect_err(|error| tracing::error!("GET {url} failed: {error}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GET {url} returned {status}");
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .inspect_err(|error| tracing::error!("Could not read the body from {url}: {error}"))?;

        ExpenseSummary::from_json(&body)
            .inspect_err(|error| tracing::error!("Invalid expense summary from {url}: {error}"))
    }
}
