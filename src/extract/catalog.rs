//! Release schedule and full anime list pages

use crate::extract::{attr_value, select_all, select_first, text_of};
use crate::record::Record;
use scraper::Html;
use serde::Serialize;
use serde_json::json;

/// Anime released on one day of the week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySchedule {
    pub day: String,
    pub anime: Vec<Record>,
}

/// English name for the site's Indonesian day headings
///
/// Unknown headings are kept as written (lower-cased).
pub fn day_name(heading: &str) -> String {
    let heading = heading.trim().to_lowercase();
    match heading.as_str() {
        "senin" => "monday",
        "selasa" => "tuesday",
        "rabu" => "wednesday",
        "kamis" => "thursday",
        "jumat" | "jum'at" => "friday",
        "sabtu" => "saturday",
        "minggu" => "sunday",
        "random" => "random",
        _ => return heading,
    }
    .to_string()
}

/// Weekly release schedule, in page order
pub fn schedules(doc: &Html) -> Vec<DaySchedule> {
    select_all(doc.root_element(), "div.kglist321")
        .into_iter()
        .filter_map(|day| {
            let heading = select_first(day, "h2")?;
            let anime = select_all(day, "a")
                .into_iter()
                .map(|a| {
                    Record::from_value(json!({
                        "title": text_of(a),
                        "url": attr_value(a, "href"),
                    }))
                })
                .collect();
            Some(DaySchedule {
                day: day_name(&text_of(heading)),
                anime,
            })
        })
        .collect()
}

/// Every anime in the alphabetical index; entries without text are skipped
pub fn anime_list(doc: &Html) -> Vec<Record> {
    select_all(doc.root_element(), "a.hodebgst")
        .into_iter()
        .filter_map(|a| {
            let title = text_of(a);
            if title.is_empty() {
                return None;
            }
            Some(Record::from_value(json!({
                "title": title,
                "url": attr_value(a, "href"),
            })))
        })
        .collect()
}
