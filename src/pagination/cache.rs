//! Shared cache of visited listing pages

use crate::pagination::PageCursor;
use crate::record::Record;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Visited listing pages keyed by numeric page number
///
/// The cache is a cheap `Clone` handle: the application builds one per
/// listing and passes it to every walker that should share it. Entries are
/// inserted on first visit and never evicted or replaced. Pages whose
/// number is a label are not cached.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    inner: Arc<Mutex<CacheInner>>,
}

#[derive(Debug, Default)]
struct CacheInner {
    pages: BTreeMap<u32, Arc<PageCursor>>,
    by_url: HashMap<String, u32>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Entries are only ever added whole, so a poisoned lock is still consistent
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached page with the given number
    pub fn get(&self, page_number: u32) -> Option<Arc<PageCursor>> {
        self.lock().pages.get(&page_number).cloned()
    }

    /// Cached page fetched from the given URL
    pub fn get_by_url(&self, url: &str) -> Option<Arc<PageCursor>> {
        let inner = self.lock();
        let number = inner.by_url.get(url)?;
        inner.pages.get(number).cloned()
    }

    /// Inserts a page unless its number is already cached
    ///
    /// # Returns
    ///
    /// * `true` - The page was added
    /// * `false` - The page has a label number or was already cached
    pub fn insert(&self, cursor: Arc<PageCursor>) -> bool {
        let Some(number) = cursor.page_number.as_number() else {
            return false;
        };

        let mut inner = self.lock();
        if inner.pages.contains_key(&number) {
            return false;
        }
        inner.by_url.insert(cursor.url.to_string(), number);
        inner.pages.insert(number, cursor);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pages.is_empty()
    }

    /// Cached page numbers in ascending order
    pub fn page_numbers(&self) -> Vec<u32> {
        self.lock().pages.keys().copied().collect()
    }

    /// Records of every cached page, ordered by page number
    pub fn records(&self) -> Vec<Record> {
        self.lock()
            .pages
            .values()
            .flat_map(|page| page.records.iter().cloned())
            .collect()
    }
}
