use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use crate::{Error, Result};

/// One Act listing. At least one of the two fields is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Act Title")]
    pub title: Option<String>,
    #[serde(rename = "PDF URL")]
    pub document_url: Option<String>,
}

/// Where the listing rows live. The site renders the same table under two
/// different wrappers depending on page state; tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    BrowseTable,
    ListPanel,
}

impl RowSource {
    pub const ORDER: [RowSource; 2] = [RowSource::BrowseTable, RowSource::ListPanel];
}

/// Where the "N results in M pages" text lives, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorSource {
    PageCount,
    PageCountWrapper,
}

impl IndicatorSource {
    pub const ORDER: [IndicatorSource; 2] =
        [IndicatorSource::PageCount, IndicatorSource::PageCountWrapper];
}

/// Which step of the fallback chain produced a page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCountBasis {
    /// Indicator text said "in N pages".
    Indicator,
    /// Indicator only gave a result count; pages inferred from the rows.
    ResultCount,
    /// Indicator text matched nothing we know; pages inferred from the rows.
    UnrecognisedText(String),
    /// No indicator element at all; pages inferred from the rows.
    MissingIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCount {
    pub total: usize,
    pub basis: PageCountBasis,
}

/// Compiled selectors and patterns for the browse listing.
/// Building one can fail; using one never does.
#[derive(Debug)]
pub struct ListingParser {
    base_url: Url,
    browse_rows: Selector,
    list_panel: Selector,
    row: Selector,
    title_link: Selector,
    pdf_link: Selector,
    page_count: Selector,
    page_count_wrapper: Selector,
    total_pages: Regex,
}

impl ListingParser {
    /// `base_url` is the origin relative PDF links are resolved against.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            browse_rows: create_selector("table.table.browse-list > tbody > tr")?,
            list_panel: create_selector("#listPanel table.table.browse-list > tbody")?,
            row: create_selector("tr")?,
            title_link: create_selector("td:first-child a.non-ajax")?,
            pdf_link: create_selector(
                r#"td.hidden-xs a.non-ajax.file-download[href*="ViewType=Pdf"]"#,
            )?,
            page_count: create_selector("div.page-count")?,
            page_count_wrapper: create_selector("div.page-count-wrapper > div.page-count")?,
            total_pages: RegexBuilder::new(r"in\s+(\d+)\s+pages")
                .case_insensitive(true)
                .build()?,
        })
    }

    /// Extracts every listing row on the page.
    /// Rows missing both a title and a PDF link are dropped; rows with only one of them are kept.
    pub fn extract_records(&self, doc: &Html) -> Vec<Record> {
        self.listing_rows(doc)
            .into_iter()
            .filter_map(|row| {
                let title = self.row_title(row);
                let document_url = self.row_document_url(row);
                if title.is_none() && document_url.is_none() {
                    return None;
                }
                Some(Record {
                    title,
                    document_url,
                })
            })
            .collect()
    }

    /// Works out how many pages the listing has. Falls back to "one page if there
    /// are rows, none otherwise" whenever the indicator is missing or unreadable.
    pub fn resolve_page_count(&self, doc: &Html) -> PageCount {
        let from_rows = || usize::from(!self.listing_rows(doc).is_empty());

        let Some(text) = self.indicator_text(doc) else {
            return PageCount {
                total: from_rows(),
                basis: PageCountBasis::MissingIndicator,
            };
        };

        let pages = self
            .total_pages
            .captures(&text)
            .and_then(|caps| caps[1].parse::<usize>().ok());

        match pages {
            Some(total) => PageCount {
                total,
                basis: PageCountBasis::Indicator,
            },
            None if text.contains("results") => PageCount {
                total: from_rows(),
                basis: PageCountBasis::ResultCount,
            },
            None => PageCount {
                total: from_rows(),
                basis: PageCountBasis::UnrecognisedText(text),
            },
        }
    }

    fn listing_rows<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        self.located_rows(doc)
            .map(|(_, rows)| rows)
            .unwrap_or_default()
    }

    /// Rows from the first strategy in [`RowSource::ORDER`] that finds any, with the strategy used.
    pub fn located_rows<'a>(
        &self,
        doc: &'a Html,
    ) -> Option<(RowSource, Vec<ElementRef<'a>>)> {
        first_non_empty(&RowSource::ORDER, |source| self.rows_from(source, doc))
    }

    fn rows_from<'a>(&self, source: RowSource, doc: &'a Html) -> Vec<ElementRef<'a>> {
        match source {
            RowSource::BrowseTable => doc.select(&self.browse_rows).collect(),
            RowSource::ListPanel => doc
                .select(&self.list_panel)
                .next()
                .map(|tbody| tbody.select(&self.row).collect())
                .unwrap_or_default(),
        }
    }

    fn indicator_text(&self, doc: &Html) -> Option<String> {
        IndicatorSource::ORDER.iter().find_map(|source| {
            let selector = match source {
                IndicatorSource::PageCount => &self.page_count,
                IndicatorSource::PageCountWrapper => &self.page_count_wrapper,
            };
            doc.select(selector).next().map(stripped_text)
        })
    }

    fn row_title(&self, row: ElementRef) -> Option<String> {
        row.select(&self.title_link)
            .next()
            .map(stripped_text)
            .filter(|title| !title.is_empty())
    }

    fn row_document_url(&self, row: ElementRef) -> Option<String> {
        let href = row.select(&self.pdf_link).next()?.value().attr("href")?;
        self.base_url.join(href).ok().map(String::from)
    }
}

/// Tries each strategy in order and returns the first non-empty result along with its strategy.
fn first_non_empty<S: Copy, T>(
    order: &[S],
    mut find: impl FnMut(S) -> Vec<T>,
) -> Option<(S, Vec<T>)> {
    order
        .iter()
        .map(|source| (*source, find(*source)))
        .find(|(_, found)| !found.is_empty())
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// Element text with every fragment trimmed and empty ones dropped, joined by single spaces.
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
