use chrono::Local;
use scraper::Html;

use crate::export::write_csv;
use crate::parse::{ListingParser, PageCount, PageCountBasis, Record};
use crate::request::{FetchOutcome, HttpFetcher, PageFetcher};
use crate::{info_time, warn_time, CrawlConfig, Error, Result, FILE_PATH};

/// Something the crawl decided along the way, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    PageFetched { page: usize, records: usize },
    PageCountResolved { total_pages: usize, basis: PageCountBasis },
    /// First page yielded no rows and the listing reports no pages.
    NoResults,
    /// A later page couldn't be fetched and contributes nothing.
    PageSkipped { page: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub records: Vec<Record>,
    pub total_pages: usize,
    pub events: Vec<CrawlEvent>,
}

impl CrawlReport {
    pub fn skipped_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|e| match e {
            CrawlEvent::PageSkipped { page, .. } => Some(*page),
            _ => None,
        })
    }
}

/// Where the walk is. `current_page` is one-based.
struct PaginationState {
    current_page: usize,
    total_pages: usize,
    records: Vec<Record>,
    events: Vec<CrawlEvent>,
}

impl PaginationState {
    fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            records: Vec::new(),
            events: Vec::new(),
        }
    }

    fn record(&mut self, event: CrawlEvent) {
        match &event {
            CrawlEvent::PageFetched { page, records } => info_time!(
                "Found {} acts on page {} (running total {})",
                records,
                page,
                self.records.len()
            ),
            CrawlEvent::PageCountResolved { total_pages, basis } => match basis {
                PageCountBasis::Indicator => {
                    info_time!("Total pages to scrape: {}", total_pages)
                }
                PageCountBasis::ResultCount => info_time!(
                    "Indicator only gives a result count, assuming {} page(s)",
                    total_pages
                ),
                PageCountBasis::UnrecognisedText(text) => warn_time!(
                    "Could not determine total pages from text: '{}'. Assuming {} page(s)",
                    text,
                    total_pages
                ),
                PageCountBasis::MissingIndicator => warn_time!(
                    "Page count element not found, assuming {} page(s)",
                    total_pages
                ),
            },
            CrawlEvent::NoResults => info_time!("No results found on the first page."),
            CrawlEvent::PageSkipped { page, reason } => {
                warn_time!("Error fetching page {}: {}. Skipping this page.", page, reason)
            }
        }
        self.events.push(event);
    }

    fn append(&mut self, records: Vec<Record>) {
        let count = records.len();
        self.records.extend(records);
        self.record(CrawlEvent::PageFetched {
            page: self.current_page,
            records: count,
        });
    }

    fn finish(self) -> CrawlReport {
        CrawlReport {
            records: self.records,
            total_pages: self.total_pages,
            events: self.events,
        }
    }
}

/// Walks the whole listing in page order and returns every record found.
///
/// Only a failure to fetch the first page is an error; a later page that can't be
/// fetched is skipped and noted in the report's events.
pub async fn crawl<F: PageFetcher>(
    fetcher: &F,
    parser: &ListingParser,
    config: &CrawlConfig,
) -> Result<CrawlReport> {
    let mut state = PaginationState::new();

    let first_url = config.page_url(1);
    info_time!("Fetching first page: {}", first_url);
    let markup = match fetcher.fetch(&first_url).await {
        FetchOutcome::Markup(markup) => markup,
        FetchOutcome::TransportFailure(reason) => {
            return Err(Error::FirstPage {
                url: first_url,
                reason,
            })
        }
    };

    let (records, page_count) = parse_first_page(parser, &markup);
    state.append(records);
    state.total_pages = page_count.total;
    state.record(CrawlEvent::PageCountResolved {
        total_pages: page_count.total,
        basis: page_count.basis,
    });

    if state.total_pages == 0 && state.records.is_empty() {
        state.record(CrawlEvent::NoResults);
        return Ok(state.finish());
    }

    for page in 2..=state.total_pages {
        state.current_page = page;
        let url = config.page_url(page);
        info_time!("Fetching page {}/{}: {}", page, state.total_pages, url);
        tokio::time::sleep(config.delay).await;

        match fetcher.fetch(&url).await {
            FetchOutcome::Markup(markup) => {
                let records = parse_page(parser, &markup);
                state.append(records);
            }
            FetchOutcome::TransportFailure(reason) => {
                state.record(CrawlEvent::PageSkipped { page, reason });
            }
        }
    }

    Ok(state.finish())
}

// `Html` never outlives these calls, so nothing that isn't `Send` is held across an await.
fn parse_first_page(parser: &ListingParser, markup: &str) -> (Vec<Record>, PageCount) {
    let doc = Html::parse_document(markup);
    (parser.extract_records(&doc), parser.resolve_page_count(&doc))
}

fn parse_page(parser: &ListingParser, markup: &str) -> Vec<Record> {
    let doc = Html::parse_document(markup);
    parser.extract_records(&doc)
}

/// Scrapes the live catalogue and writes it to [`FILE_PATH`].
pub async fn process_site() -> Result<()> {
    let start_time = Local::now();
    let config = CrawlConfig::default();
    let fetcher = HttpFetcher::new(&config)?;
    let parser = ListingParser::new(&config.base_url)?;

    info_time!("Started scraping");
    let report = crawl(&fetcher, &parser, &config).await?;

    let skipped: Vec<_> = report.skipped_pages().collect();
    info_time!(
        start_time,
        "Total acts extracted from {} page(s): {} (skipped pages: {:?})",
        report.total_pages,
        report.records.len(),
        skipped
    );

    let local_now = Local::now();
    if write_csv(FILE_PATH, &report.records).await? {
        info_time!(local_now, "Wrote the results to file: {FILE_PATH}");
    } else {
        info_time!("No data was extracted by the scraper.");
    }

    Ok(())
}
