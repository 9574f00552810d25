use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client,
};

use crate::{CrawlConfig, Result, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

/// What came back from asking for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Markup(String),
    /// Anything that kept us from getting a body: connect errors, timeouts, non-2xx statuses.
    TransportFailure(String),
}

/// Source of raw listing pages.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Fetches pages over HTTP with a fixed header set and per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Requests a page and returns a `Result<String>` containing the HTML.
    async fn request_page_html(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let html = res.text().await?;
        Ok(html)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.request_page_html(url).await {
            Ok(html) => FetchOutcome::Markup(html),
            Err(e) => FetchOutcome::TransportFailure(e.to_string()),
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers
}
