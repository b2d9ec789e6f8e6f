//! Lazy traversal of paginated listing pages
//!
//! This module turns a chain of listing pages into one record sequence:
//! - [`PageCursor`]: one fetched and parsed listing page
//! - [`PageCache`]: pages already visited, shared between walkers on request
//! - [`PageWalker`]: the sequential state machine moving between pages

mod cache;
mod cursor;
mod page_number;
mod walker;

pub use cache::PageCache;
pub use cursor::{PageCursor, RecordExtractor};
pub use page_number::PageNumber;
pub use walker::PageWalker;
