//! Search result pages
//!
//! Results are plain un-classed `<li>` entries. Which list an entry belongs
//! to is decided by its link text: anime entries carry an episode range in
//! parentheses, episode entries read "episode N subtitle indonesia", batch
//! entries are tagged `[BATCH]`.

use crate::extract::{attr_value, link_entries, select_all, select_first, split_detail, text_of};
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::{json, Map, Value};

static ANIME_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.+1.+\d{1,3}\)").expect("anime title pattern is valid"));

static EPISODE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:episode )(\d+)(?: subtitle indonesia)").expect("episode title pattern is valid")
});

const BATCH_TAG: &str = "[BATCH]";

/// Un-classed list entries together with their first link
fn entries(doc: &Html) -> Vec<(ElementRef<'_>, ElementRef<'_>)> {
    select_all(doc.root_element(), "li:not([class])")
        .into_iter()
        .filter_map(|li| select_first(li, "a").map(|a| (li, a)))
        .collect()
}

/// Anime entries: title, link, thumbnail, genres, status and rating
pub fn anime_results(doc: &Html) -> Vec<Record> {
    entries(doc)
        .into_iter()
        .filter(|(_, a)| ANIME_TITLE.is_match(&text_of(*a).to_lowercase()))
        .map(|(li, a)| {
            let divs = select_all(li, "div");
            let thumbnails = select_first(li, "img")
                .map(crate::extract::thumbnail)
                .unwrap_or_else(|| Value::Object(Map::new()));
            let genres = divs.first().map(|div| link_entries(*div)).unwrap_or_default();

            Record::from_value(json!({
                "title": text_of(a),
                "url": attr_value(a, "href"),
                "thumbnails": thumbnails,
                "genres": genres,
                "status": labelled_value(divs.get(1).copied()),
                "rating": labelled_value(divs.get(2).copied()),
            }))
        })
        .collect()
}

/// Episode entries with the episode number taken from the title
pub fn episode_results(doc: &Html) -> Vec<Record> {
    entries(doc)
        .into_iter()
        .filter_map(|(_, a)| {
            let title = text_of(a);
            let lowered = title.to_lowercase();
            let episode = EPISODE_TITLE
                .captures(&lowered)?
                .get(1)
                .map(|m| m.as_str().to_string())?;

            Some(Record::from_value(json!({
                "title": title,
                "url": attr_value(a, "href"),
                "episode": episode,
            })))
        })
        .collect()
}

/// Batch download entries
pub fn batch_results(doc: &Html) -> Vec<Record> {
    entries(doc)
        .into_iter()
        .filter(|(_, a)| text_of(*a).contains(BATCH_TAG))
        .map(|(_, a)| {
            Record::from_value(json!({
                "title": text_of(a),
                "url": attr_value(a, "href"),
            }))
        })
        .collect()
}

/// Value part of a `Label : value` block, or `null`
fn labelled_value(div: Option<ElementRef<'_>>) -> Value {
    div.and_then(|div| split_detail(&text_of(div)))
        .map(|(_, value)| Value::String(value))
        .unwrap_or(Value::Null)
}
