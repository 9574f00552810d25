//! Scraper for the Singapore Statutes Online catalogue of current Acts.
//!
//! Walks the paginated browse listing one page at a time, pulls the Act title and
//! PDF link out of every row and writes the lot to a CSV file.

use std::time::Duration;

mod error;
pub mod export;
#[doc(hidden)]
pub mod macros;
pub mod parse;
pub mod process;
pub mod request;

pub use error::{Error, Result};

pub const BASE_URL: &str = "https://sso.agc.gov.sg";
pub const INITIAL_BROWSE_PATH: &str = "/Browse/Act/Current/All";
pub const PAGE_SIZE: usize = 500;
pub const SORT_PARAMS: &str = "SortBy=Title&SortOrder=ASC";
pub const DELAY_BETWEEN_REQUESTS: Duration = Duration::from_secs(2);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
pub const FILE_PATH: &str = "acts_data.csv";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Everything the crawl needs to know about the target site.
/// `Default` gives the live site; tests swap in a mock server and a zero delay.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub browse_path: String,
    pub page_size: usize,
    pub sort_params: String,
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.into(),
            browse_path: INITIAL_BROWSE_PATH.into(),
            page_size: PAGE_SIZE,
            sort_params: SORT_PARAMS.into(),
            delay: DELAY_BETWEEN_REQUESTS,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl CrawlConfig {
    /// Listing URL for a one-based page number.
    /// The site routes page N under the zero-based path segment `N - 1`,
    /// and the first page has no segment at all.
    pub fn page_url(&self, page_number: usize) -> String {
        let query = format!("PageSize={}&{}", self.page_size, self.sort_params);
        let base = self.base_url.trim_end_matches('/');
        match page_number {
            0 | 1 => format!("{base}{}?{query}", self.browse_path),
            n => format!("{base}{}/{}?{query}", self.browse_path, n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_index_segment() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.page_url(1),
            "https://sso.agc.gov.sg/Browse/Act/Current/All?PageSize=500&SortBy=Title&SortOrder=ASC"
        );
    }

    #[test]
    fn later_pages_use_zero_based_segment() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.page_url(2),
            "https://sso.agc.gov.sg/Browse/Act/Current/All/1?PageSize=500&SortBy=Title&SortOrder=ASC"
        );
        assert!(config.page_url(7).contains("/All/6?"));
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let config = CrawlConfig {
            base_url: "http://127.0.0.1:3000/".into(),
            ..CrawlConfig::default()
        };
        assert!(config
            .page_url(3)
            .starts_with("http://127.0.0.1:3000/Browse/Act/Current/All/2?"));
    }
}
