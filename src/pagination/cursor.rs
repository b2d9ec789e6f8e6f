//! One parsed listing page

use crate::extract::{listing, parse_document};
use crate::pagination::PageNumber;
use crate::record::Record;
use scraper::Html;
use url::Url;

/// Field extractor producing the records of one listing page
pub type RecordExtractor = fn(&Html) -> Vec<Record>;

/// A fetched listing page: its position, its records and links to its neighbours
///
/// Cursors are never modified after construction. Walkers and the page cache
/// share them behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    /// URL the page was fetched from
    pub url: Url,

    /// Label of the "current page" marker
    pub page_number: PageNumber,

    /// Records in document order
    pub records: Vec<Record>,

    /// Absolute URL of the previous page; absent on the first page
    pub previous_page_url: Option<Url>,

    /// Absolute URL of the next page; absent on the last page
    pub next_page_url: Option<Url>,
}

impl PageCursor {
    /// Parses a listing page body fetched from `url`
    ///
    /// Missing pagination structure never fails: a page with no widget at
    /// all is a single first page, and a page that links backwards but shows
    /// no current marker gets an empty label.
    ///
    /// # Example
    ///
    /// ```
    /// use otakudesu_scraper::extract::listing;
    /// use otakudesu_scraper::pagination::{PageCursor, PageNumber};
    /// use url::Url;
    ///
    /// let url = Url::parse("https://otakudesu.example/ongoing-anime/").unwrap();
    /// let cursor = PageCursor::parse("<html></html>", url, listing::ongoing_releases);
    /// assert_eq!(cursor.page_number, PageNumber::Numeric(1));
    /// assert!(cursor.is_last());
    /// ```
    pub fn parse(body: &str, url: Url, extract: RecordExtractor) -> Self {
        let doc = parse_document(body);
        let previous_page_url = listing::previous_page_link(&doc, &url);
        let next_page_url = listing::next_page_link(&doc, &url);
        let page_number = match listing::current_page_number(&doc) {
            Some(number) => number,
            None if previous_page_url.is_none() => PageNumber::Numeric(1),
            None => PageNumber::Label(String::new()),
        };

        Self {
            records: extract(&doc),
            url,
            page_number,
            previous_page_url,
            next_page_url,
        }
    }

    pub fn is_first(&self) -> bool {
        self.previous_page_url.is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next_page_url.is_none()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
