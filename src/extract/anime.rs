//! Anime detail pages

use crate::extract::{
    attr_value, link_entries, select_all, select_first, split_detail, text_of, thumbnail_under,
    titled_links,
};
use crate::record::Record;
use scraper::Html;
use serde_json::{json, Map, Value};

/// Maps the site's Indonesian detail labels to record field names
pub fn detail_field(label: &str) -> String {
    match label {
        "judul" => "title",
        "japanese" => "japaneseTitle",
        "skor" => "rating",
        "produser" => "producer",
        "tipe" => "type",
        "status" => "status",
        "total episode" => "totalEpisodes",
        "durasi" => "duration",
        "tanggal rilis" => "releaseDate",
        "studio" => "studio",
        other => other,
    }
    .to_string()
}

/// Every field of an anime page
pub fn page(doc: &Html) -> Record {
    Record::from_value(json!({
        "title": title(doc),
        "thumbnails": thumbnails(doc),
        "details": Value::Object(details(doc)),
        "feed": feed(doc),
        "description": description(doc),
        "seasons": seasons(doc),
        "episodes": episodes(doc),
        "batch": batch(doc),
    }))
}

/// Fields merged into a listing record when it is enriched as an anime
///
/// Detail fields are flattened into the record itself; the page's lists are
/// added under their own names.
pub fn enrichment_patch(doc: &Html) -> Record {
    let mut patch = Record::from(details(doc));
    patch.insert("episodes", episodes(doc));
    patch.insert("batch", batch(doc));
    patch.insert("description", description(doc));
    patch.insert("seasons", seasons(doc));
    patch.insert("feeds", feed(doc));
    patch
}

/// Heading of the page's first content block
pub fn title(doc: &Html) -> Value {
    select_first(doc.root_element(), "div")
        .and_then(|div| select_first(div, "h1"))
        .map(|h1| Value::String(text_of(h1)))
        .unwrap_or(Value::Null)
}

pub fn thumbnails(doc: &Html) -> Value {
    thumbnail_under(doc.root_element(), "div.fotoanime")
}

/// Labelled details from the info block plus the genre links of its last line
pub fn details(doc: &Html) -> Map<String, Value> {
    let mut details = Map::new();
    let spans = select_first(doc.root_element(), "div.infozin")
        .map(|block| select_all(block, "span"))
        .unwrap_or_default();

    let Some((genre_line, labelled)) = spans.split_last() else {
        details.insert("genres".to_string(), Value::Array(Vec::new()));
        return details;
    };

    for span in labelled {
        if let Some((label, value)) = split_detail(&text_of(*span)) {
            details.insert(detail_field(&label), Value::String(value));
        }
    }
    details.insert(
        "genres".to_string(),
        Value::Array(link_entries(*genre_line)),
    );
    details
}

/// Related posts shown under the synopsis
pub fn feed(doc: &Html) -> Vec<Value> {
    select_all(doc.root_element(), "div.isi-anime")
        .into_iter()
        .map(|item| {
            let link = select_first(item, "a");
            let thumbnail = link
                .and_then(|a| select_first(a, "img"))
                .map(|img| attr_value(img, "src"))
                .unwrap_or(Value::Null);
            json!({
                "title": text_of(item),
                "url": link.map(|a| attr_value(a, "href")).unwrap_or(Value::Null),
                "thumbnail": thumbnail,
            })
        })
        .collect()
}

/// Synopsis text, empty when the page has none
pub fn description(doc: &Html) -> String {
    select_first(doc.root_element(), "div.sinopc")
        .map(text_of)
        .unwrap_or_default()
}

/// Other seasons linked from the second synopsis paragraph
pub fn seasons(doc: &Html) -> Vec<Value> {
    select_first(doc.root_element(), "div.sinopc")
        .map(|synopsis| select_all(synopsis, "p"))
        .and_then(|paragraphs| paragraphs.get(1).copied())
        .map(titled_links)
        .unwrap_or_default()
}

/// Episode list, oldest first
///
/// The page's first episode block is the batch link; episodes live in the
/// second one, newest first.
pub fn episodes(doc: &Html) -> Vec<Value> {
    let blocks = select_all(doc.root_element(), "div.episodelist");
    let Some(block) = blocks.get(1) else {
        return Vec::new();
    };

    let mut episodes: Vec<Value> = select_all(*block, "li")
        .into_iter()
        .filter_map(|li| {
            let spans = select_all(li, "span");
            let first = *spans.first()?;
            let release_date = if spans.len() > 1 {
                spans.last().map(|s| Value::String(text_of(*s))).unwrap_or(Value::Null)
            } else {
                Value::Null
            };
            Some(json!({
                "title": text_of(first),
                "url": select_first(first, "a").map(|a| attr_value(a, "href")).unwrap_or(Value::Null),
                "releaseDate": release_date,
            }))
        })
        .collect();
    episodes.reverse();
    episodes
}

/// Batch download entry from the first episode block, or `{}`
pub fn batch(doc: &Html) -> Value {
    let spans = select_first(doc.root_element(), "div.episodelist")
        .map(|block| select_all(block, "span"))
        .unwrap_or_default();

    if spans.len() < 3 {
        return Value::Object(Map::new());
    }

    json!({
        "title": text_of(spans[0]),
        "url": select_first(spans[1], "a").map(|a| attr_value(a, "href")).unwrap_or(Value::Null),
        "releaseDate": text_of(spans[2]),
    })
}
