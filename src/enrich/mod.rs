//! Concurrent enrichment of records from their detail pages
//!
//! Each top-level record carries a `url` pointing at its own detail page.
//! The [`Enricher`] fetches those pages concurrently over one pooled client
//! and merges the parsed detail fields back into the records.

mod kind;
mod orchestrator;

pub use kind::EnrichmentKind;
pub use orchestrator::{
    EnrichOptions, Enricher, EnrichmentBatch, EnrichmentFailure, EnrichmentReport,
};
