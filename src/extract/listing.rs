//! Ongoing-anime listing pages and their pagination widget

use crate::extract::{
    attr_value, first_href, resolve_link, select_all, select_first, text_of, text_value, thumbnail,
};
use crate::pagination::PageNumber;
use crate::record::Record;
use scraper::Html;
use serde_json::{json, Map, Value};
use url::Url;

/// Releases listed on one ongoing-anime page, in document order
pub fn ongoing_releases(doc: &Html) -> Vec<Record> {
    select_all(doc.root_element(), "div.detpost")
        .into_iter()
        .map(|release| {
            let thumbnail = select_first(release, "img")
                .map(thumbnail)
                .unwrap_or_else(|| Value::Object(Map::new()));

            Record::from_value(json!({
                "title": text_value(release, "h2"),
                "latestUpload": {
                    "uploadDate": text_value(release, ".newnime"),
                    "uploadDay": text_value(release, "div.epztipe"),
                    "episode": text_value(release, ".epz"),
                },
                "url": first_href(release),
                "thumbnail": thumbnail,
            }))
        })
        .collect()
}

/// Text of the "current page" marker, if the page has a pagination widget
pub fn current_page_label(doc: &Html) -> Option<String> {
    select_first(doc.root_element(), "span.page-numbers.current").map(text_of)
}

/// Page number of the current page
pub fn current_page_number(doc: &Html) -> Option<PageNumber> {
    current_page_label(doc).map(|label| PageNumber::parse(&label))
}

/// Absolute URL of the previous page
pub fn previous_page_link(doc: &Html, base_url: &Url) -> Option<Url> {
    widget_link(doc, "a.prev.page-numbers", base_url)
}

/// Absolute URL of the next page
pub fn next_page_link(doc: &Html, base_url: &Url) -> Option<Url> {
    widget_link(doc, "a.next.page-numbers", base_url)
}

/// Every numbered link in the pagination widget as `{pageNumber, url}`
pub fn page_links(doc: &Html, base_url: &Url) -> Vec<Record> {
    select_all(doc.root_element(), "a.page-numbers")
        .into_iter()
        .map(|page| {
            let url = page
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
                .map(|url| Value::String(url.to_string()))
                .unwrap_or_else(|| attr_value(page, "href"));
            Record::from_value(json!({
                "pageNumber": PageNumber::parse(&text_of(page)).to_value(),
                "url": url,
            }))
        })
        .collect()
}

fn widget_link(doc: &Html, css: &str, base_url: &Url) -> Option<Url> {
    let anchor = select_first(doc.root_element(), css)?;
    resolve_link(anchor.value().attr("href")?, base_url)
}
