//! Batch download pages

use crate::extract::{download_links, select_first, text_of, thumbnail_under};
use crate::record::Record;
use scraper::Html;
use serde_json::{json, Value};

/// Every field of a batch page
pub fn page(doc: &Html) -> Record {
    Record::from_value(json!({
        "title": title(doc),
        "description": description(doc),
        "thumbnails": thumbnails(doc),
        "links": links(doc),
    }))
}

/// Fields merged into a batch record when it is enriched
pub fn enrichment_patch(doc: &Html) -> Record {
    Record::from_value(json!({
        "thumbnails": thumbnails(doc),
        "description": description(doc),
        "links": links(doc),
    }))
}

pub fn title(doc: &Html) -> String {
    select_first(doc.root_element(), "h4")
        .map(text_of)
        .unwrap_or_default()
}

pub fn description(doc: &Html) -> String {
    select_first(doc.root_element(), "div.deskripsi")
        .and_then(|block| select_first(block, "p"))
        .map(text_of)
        .unwrap_or_default()
}

pub fn thumbnails(doc: &Html) -> Value {
    thumbnail_under(doc.root_element(), "div.animeinfo")
}

pub fn links(doc: &Html) -> Value {
    download_links(doc.root_element(), "div.download2")
}
