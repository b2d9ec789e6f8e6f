//! Sequential walker over a chain of listing pages

use crate::fetch::Fetcher;
use crate::pagination::{PageCache, PageCursor, PageNumber, RecordExtractor};
use crate::record::Record;
use crate::{OtakuError, Result};
use futures::stream::{self, Stream};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Lazy, finite walk over paginated listing pages
///
/// The walker sits on one [`PageCursor`] at a time. Records are handed out
/// in page order and the next page is only fetched once the current one is
/// used up. Page fetches are strictly sequential.
///
/// When a [`PageCache`] is supplied, every numbered page the walker lands on
/// is stored in it and later transitions to a cached page cost no fetch.
///
/// The record sequence never enters the same page twice in one traversal.
/// A site whose "next" links loop back ends the sequence instead of
/// repeating it.
pub struct PageWalker {
    fetcher: Fetcher,
    extract: RecordExtractor,
    cache: Option<PageCache>,
    current: Arc<PageCursor>,
    position: usize,
    seen_pages: HashSet<u32>,
    seen_urls: HashSet<String>,
    exhausted: bool,
}

impl PageWalker {
    /// Opens a walker on the seed page
    ///
    /// With a cache that already holds the seed URL no request is made.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetch client shared with the rest of the application
    /// * `seed` - URL of the first page to visit
    /// * `extract` - Field extractor for the records of each page
    /// * `cache` - Page cache to read from and populate, if any
    pub async fn open(
        fetcher: Fetcher,
        seed: Url,
        extract: RecordExtractor,
        cache: Option<PageCache>,
    ) -> Result<Self> {
        let current = match cache.as_ref().and_then(|c| c.get_by_url(seed.as_str())) {
            Some(cursor) => {
                tracing::debug!("Cache hit for seed page {}", seed);
                cursor
            }
            None => Self::fetch_cursor(&fetcher, seed, extract, cache.as_ref()).await?,
        };

        let mut walker = Self {
            fetcher,
            extract,
            cache,
            current,
            position: 0,
            seen_pages: HashSet::new(),
            seen_urls: HashSet::new(),
            exhausted: false,
        };
        walker.reset_traversal();
        Ok(walker)
    }

    /// The page the walker currently sits on
    pub fn current(&self) -> &PageCursor {
        &self.current
    }

    pub fn page_number(&self) -> &PageNumber {
        &self.current.page_number
    }

    /// Records of the current page
    pub fn records(&self) -> &[Record] {
        &self.current.records
    }

    pub fn has_next_page(&self) -> bool {
        self.current.next_page_url.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current.previous_page_url.is_some()
    }

    pub fn cache(&self) -> Option<&PageCache> {
        self.cache.as_ref()
    }

    /// Moves to the next page
    ///
    /// Returns `Ok(false)` without fetching when the current page is the last.
    /// A failed fetch leaves the walker where it was.
    pub async fn advance(&mut self) -> Result<bool> {
        self.jump(Direction::Forward).await
    }

    /// Moves to the previous page
    ///
    /// Returns `Ok(false)` without fetching when the current page is the first.
    pub async fn retreat(&mut self) -> Result<bool> {
        self.jump(Direction::Backward).await
    }

    /// Next record of the sequence, moving on to the next page when needed
    ///
    /// Returns `Ok(None)` once the last page is used up or the next page
    /// was already entered during this traversal.
    pub async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.current.records.get(self.position) {
                self.position += 1;
                return Ok(Some(record.clone()));
            }

            if self.exhausted {
                return Ok(None);
            }

            let Some(next_url) = self.current.next_page_url.clone() else {
                self.exhausted = true;
                return Ok(None);
            };

            if self.seen_urls.contains(next_url.as_str()) {
                tracing::warn!("Pagination loops back to {}, stopping", next_url);
                self.exhausted = true;
                return Ok(None);
            }

            let cursor = self
                .load(self.current.page_number.next(), next_url.clone())
                .await?;
            if let Some(number) = cursor.page_number.as_number() {
                if !self.seen_pages.insert(number) {
                    tracing::warn!(
                        "Page {} reached again via {}, stopping",
                        number,
                        next_url
                    );
                    self.exhausted = true;
                    return Ok(None);
                }
            }

            tracing::info!("Moved to page {} ({})", cursor.page_number, cursor.url);
            self.seen_urls.insert(next_url.to_string());
            self.seen_urls.insert(cursor.url.to_string());
            self.current = cursor;
            self.position = 0;
        }
    }

    /// Drains the sequence from the start of the current page
    ///
    /// Records are concatenated in page order.
    pub async fn collect_all(&mut self) -> Result<Vec<Record>> {
        self.reset_traversal();
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Every record seen so far
    ///
    /// With a cache this is the content of every cached page ordered by page
    /// number, including pages visited by other walkers sharing the cache.
    /// Without one it is the current page only.
    pub fn results(&self) -> Vec<Record> {
        match &self.cache {
            Some(cache) => cache.records(),
            None => self.current.records.clone(),
        }
    }

    /// Consumes the walker into a stream of records
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> {
        stream::try_unfold(self, |mut walker| async move {
            let record = walker.next_record().await?;
            Ok::<_, OtakuError>(record.map(|record| (record, walker)))
        })
    }

    async fn jump(&mut self, direction: Direction) -> Result<bool> {
        let (number, target) = match direction {
            Direction::Forward => (
                self.current.page_number.next(),
                self.current.next_page_url.clone(),
            ),
            Direction::Backward => (
                self.current.page_number.previous(),
                self.current.previous_page_url.clone(),
            ),
        };
        let Some(url) = target else {
            return Ok(false);
        };

        let cursor = self.load(number, url).await?;
        tracing::info!("Moved to page {} ({})", cursor.page_number, cursor.url);
        self.current = cursor;
        self.reset_traversal();
        Ok(true)
    }

    /// Cursor of the page at `url`, from the cache when possible
    ///
    /// `number` is the page number the target is expected to carry.
    async fn load(&self, number: Option<u32>, url: Url) -> Result<Arc<PageCursor>> {
        if let Some(cache) = &self.cache {
            let hit = number
                .and_then(|n| cache.get(n))
                .or_else(|| cache.get_by_url(url.as_str()));
            if let Some(cursor) = hit {
                tracing::debug!("Cache hit for page {}", cursor.page_number);
                return Ok(cursor);
            }
            tracing::debug!("Cache miss for {}", url);
        }

        Self::fetch_cursor(&self.fetcher, url, self.extract, self.cache.as_ref()).await
    }

    async fn fetch_cursor(
        fetcher: &Fetcher,
        url: Url,
        extract: RecordExtractor,
        cache: Option<&PageCache>,
    ) -> Result<Arc<PageCursor>> {
        let body = fetcher.fetch_page(url.as_str()).await?;
        let cursor = Arc::new(PageCursor::parse(&body, url, extract));

        if let Some(cache) = cache {
            cache.insert(Arc::clone(&cursor));
        }
        Ok(cursor)
    }

    /// Starts a new traversal at the current page
    fn reset_traversal(&mut self) {
        self.position = 0;
        self.exhausted = false;
        self.seen_pages.clear();
        self.seen_urls.clear();
        if let Some(number) = self.current.page_number.as_number() {
            self.seen_pages.insert(number);
        }
        self.seen_urls.insert(self.current.url.to_string());
    }
}

impl std::fmt::Debug for PageWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageWalker")
            .field("page_number", &self.current.page_number)
            .field("url", &self.current.url.as_str())
            .field("position", &self.position)
            .field("exhausted", &self.exhausted)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
