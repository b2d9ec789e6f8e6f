//! Field extractors for every page type of the site
//!
//! Extractors are plain functions over a parsed [`Html`] document. They never
//! fail: missing markup yields `null`, an empty string, an empty list or an
//! empty object, so a layout change degrades a field instead of aborting a
//! whole listing.
//!
//! - [`listing`]: ongoing-anime listing items and pagination links
//! - [`search`]: search result entries (anime, episodes, batches)
//! - [`anime`], [`episode`], [`batch`]: detail pages
//! - [`catalog`]: release schedules and the full anime list

pub mod anime;
pub mod batch;
pub mod catalog;
pub mod episode;
pub mod listing;
pub mod search;

use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};
use url::Url;

/// Separator between a label and its value in detail blocks ("Skor: 8.7")
pub const DETAILS_DELIMITER: char = ':';

/// Parses an HTML document
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// All descendants of `scope` matching `css`
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    let matches: Vec<ElementRef<'a>> = scope.select(&selector).collect();
    matches
}

/// First descendant of `scope` matching `css`
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let first = scope.select(&selector).next();
    first
}

/// Trimmed text content of an element
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match, or `null`
pub(crate) fn text_value(scope: ElementRef<'_>, css: &str) -> Value {
    select_first(scope, css)
        .map(|el| Value::String(text_of(el)))
        .unwrap_or(Value::Null)
}

/// Attribute value, or `null`
pub(crate) fn attr_value(element: ElementRef<'_>, name: &str) -> Value {
    element
        .value()
        .attr(name)
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null)
}

/// `href` of the first link inside `scope`, or `null`
pub(crate) fn first_href(scope: ElementRef<'_>) -> Value {
    select_first(scope, "a")
        .map(|a| attr_value(a, "href"))
        .unwrap_or(Value::Null)
}

/// Thumbnail block for an `<img>`: source, dimensions and srcset URLs
///
/// A srcset like `a.jpg 1x, b.jpg 2x` keeps only the URLs.
pub(crate) fn thumbnail(img: ElementRef<'_>) -> Value {
    let srcset: Vec<Value> = img
        .value()
        .attr("srcset")
        .map(|set| {
            set.split_whitespace()
                .step_by(2)
                .map(|url| Value::String(url.trim_end_matches(',').to_string()))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "url": attr_value(img, "src"),
        "width": attr_value(img, "width"),
        "height": attr_value(img, "height"),
        "srcset": srcset,
    })
}

/// Thumbnail of the first `<img>` under the first match of `css`, or `{}`
pub(crate) fn thumbnail_under(scope: ElementRef<'_>, css: &str) -> Value {
    select_first(scope, css)
        .and_then(|container| select_first(container, "img"))
        .map(thumbnail)
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// `[{text, url}]` for every link under `scope`
pub(crate) fn link_entries(scope: ElementRef<'_>) -> Vec<Value> {
    select_all(scope, "a")
        .into_iter()
        .map(|a| json!({ "text": text_of(a), "url": attr_value(a, "href") }))
        .collect()
}

/// `[{title, url}]` for every link under `scope`
pub(crate) fn titled_links(scope: ElementRef<'_>) -> Vec<Value> {
    select_all(scope, "a")
        .into_iter()
        .map(|a| json!({ "title": text_of(a), "url": attr_value(a, "href") }))
        .collect()
}

/// Download links grouped by resolution
///
/// Each `<li>` under the first match of `css` holds a `<strong>` resolution
/// label followed by one link per file host.
pub(crate) fn download_links(scope: ElementRef<'_>, css: &str) -> Value {
    let mut links = Map::new();
    let Some(container) = select_first(scope, css) else {
        return Value::Object(links);
    };

    for resolution in select_all(container, "li") {
        let Some(label) = select_first(resolution, "strong") else {
            continue;
        };
        let hosts: Vec<Value> = select_all(resolution, "a")
            .into_iter()
            .map(|a| {
                json!({
                    "host": text_of(a).to_lowercase(),
                    "url": attr_value(a, "href"),
                })
            })
            .collect();
        links.insert(text_of(label).to_lowercase(), Value::Array(hosts));
    }

    Value::Object(links)
}

/// Splits a `Label: value` line into a lower-cased label and a trimmed value
pub(crate) fn split_detail(text: &str) -> Option<(String, String)> {
    let (label, value) = text.split_once(DETAILS_DELIMITER)?;
    Some((label.trim().to_lowercase(), value.trim().to_string()))
}

/// Text following `marker` ("Posted by admin" -> "admin"), or the whole text
pub(crate) fn text_after(text: &str, marker: &str) -> String {
    match text.split_once(marker) {
        Some((_, rest)) => rest.trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for empty hrefs, fragment-only links, non-HTTP schemes and
/// anything that fails to join onto `base_url`.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
