//! Episode pages

use crate::extract::{
    attr_value, download_links, link_entries, select_all, select_first, split_detail, text_after,
    text_of, thumbnail_under,
};
use crate::record::Record;
use scraper::Html;
use serde_json::{json, Map, Value};

/// Maps the site's episode detail labels to record field names
pub fn detail_field(label: &str) -> String {
    match label {
        "tipe" => "type",
        other => other,
    }
    .to_string()
}

/// Every field of an episode page
pub fn page(doc: &Html) -> Record {
    Record::from_value(json!({
        "title": title(doc),
        "thumbnails": thumbnails(doc),
        "details": Value::Object(details(doc)),
        "episodes": episodes(doc),
        "links": links(doc),
    }))
}

/// Fields merged into an episode record when it is enriched
pub fn enrichment_patch(doc: &Html) -> Record {
    Record::from_value(json!({
        "details": Value::Object(details(doc)),
        "thumbnails": thumbnails(doc),
        "otherEpisodes": episodes(doc),
        "links": links(doc),
    }))
}

pub fn title(doc: &Html) -> String {
    select_first(doc.root_element(), "h4")
        .map(text_of)
        .unwrap_or_default()
}

pub fn thumbnails(doc: &Html) -> Value {
    thumbnail_under(doc.root_element(), "div.cukder")
}

/// Labelled details, uploader line and genres
///
/// Returns `{}` when the page has no details block at all.
pub fn details(doc: &Html) -> Map<String, Value> {
    let root = doc.root_element();
    let mut details = Map::new();
    let Some(block) = select_first(root, "div.infozingle") else {
        return details;
    };

    for span in select_all(block, "span") {
        if let Some((label, value)) = split_detail(&text_of(span)) {
            details.insert(detail_field(&label), Value::String(value));
        }
    }

    let posted = select_first(root, "div.kategoz")
        .map(|line| select_all(line, "span"))
        .filter(|spans| spans.len() > 1);
    let (uploader, upload_time) = match posted {
        Some(spans) => (
            Value::String(text_after(&text_of(spans[0]), " by ")),
            Value::String(text_after(&text_of(spans[1]), " on ")),
        ),
        None => (Value::Null, Value::Null),
    };

    details.insert("uploader".to_string(), uploader);
    details.insert("uploadTime".to_string(), upload_time);
    details.insert("genres".to_string(), Value::Array(link_entries(block)));
    details
}

/// Other episodes of the same anime, oldest first
pub fn episodes(doc: &Html) -> Vec<Value> {
    let mut episodes: Vec<Value> = select_first(doc.root_element(), "div.cukder")
        .map(|block| select_all(block, "li"))
        .unwrap_or_default()
        .into_iter()
        .map(|li| {
            let link = select_first(li, "a");
            json!({
                "title": link.map(|a| Value::String(text_of(a))).unwrap_or(Value::Null),
                "url": link.map(|a| attr_value(a, "href")).unwrap_or(Value::Null),
            })
        })
        .collect();
    episodes.reverse();
    episodes
}

/// Download links grouped by resolution
pub fn links(doc: &Html) -> Value {
    download_links(doc.root_element(), "div.download")
}
