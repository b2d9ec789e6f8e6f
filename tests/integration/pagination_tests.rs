//! Listing walker tests: traversal order, caching and loop protection

use crate::common::{fetcher, linear_page, listing_page, listing_path, mount_page, mount_status};
use futures::TryStreamExt;
use otakudesu_scraper::extract::listing::ongoing_releases;
use otakudesu_scraper::{OtakuError, PageCache, PageNumber, PageWalker, Record};
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

fn url_of(server: &MockServer, page_path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), page_path)).unwrap()
}

fn titles(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.title().unwrap_or_default().to_string())
        .collect()
}

async fn open(server: &MockServer, page_path: &str, cache: Option<PageCache>) -> PageWalker {
    PageWalker::open(fetcher(), url_of(server, page_path), ongoing_releases, cache)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_drain_two_pages_with_two_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 2, 5), 1).await;
    mount_page(&server, &listing_path(2), linear_page(2, 2, 3), 1).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    let records = walker.collect_all().await.unwrap();

    assert_eq!(records.len(), 8);
    assert_eq!(
        titles(&records),
        [
            "Page 1 #1", "Page 1 #2", "Page 1 #3", "Page 1 #4", "Page 1 #5", "Page 2 #1",
            "Page 2 #2", "Page 2 #3",
        ]
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_record_by_record_matches_page_concatenation() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 2, 2), 1).await;
    mount_page(&server, &listing_path(2), linear_page(2, 2, 2), 1).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    let mut expected = walker.records().to_vec();

    let mut drained = Vec::new();
    while let Some(record) = walker.next_record().await.unwrap() {
        drained.push(record);
    }
    expected.extend_from_slice(walker.records());

    assert_eq!(drained, expected);
    assert_eq!(walker.page_number(), &PageNumber::Numeric(2));
    assert!(walker.next_record().await.unwrap().is_none());
}

#[tokio::test]
async fn test_three_pages_terminate_without_fourth_fetch() {
    let server = MockServer::start().await;
    for n in 1..=3 {
        mount_page(&server, &listing_path(n), linear_page(n, 3, 2), 1).await;
    }
    mount_page(&server, &listing_path(4), linear_page(4, 4, 2), 0).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    let records = walker.collect_all().await.unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(records[5].title(), Some("Page 3 #2"));
    assert!(!walker.has_next_page());
}

#[tokio::test]
async fn test_stream_yields_every_record() {
    let server = MockServer::start().await;
    for n in 1..=3 {
        mount_page(&server, &listing_path(n), linear_page(n, 3, 1), 1).await;
    }

    let walker = open(&server, &listing_path(1), None).await;
    let records: Vec<Record> = walker.into_stream().try_collect().await.unwrap();

    assert_eq!(titles(&records), ["Page 1 #1", "Page 2 #1", "Page 3 #1"]);
}

#[tokio::test]
async fn test_advance_then_retreat_is_a_cache_hit() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 3, 2), 0).await;
    mount_page(&server, &listing_path(2), linear_page(2, 3, 2), 1).await;
    mount_page(&server, &listing_path(3), linear_page(3, 3, 2), 1).await;

    let cache = PageCache::new();
    let mut walker = open(&server, &listing_path(2), Some(cache.clone())).await;
    let original = walker.records().to_vec();

    assert!(walker.advance().await.unwrap());
    assert_eq!(walker.page_number(), &PageNumber::Numeric(3));
    assert!(walker.retreat().await.unwrap());

    assert_eq!(walker.page_number(), &PageNumber::Numeric(2));
    assert_eq!(walker.records(), original.as_slice());
    assert_eq!(cache.page_numbers(), [2, 3]);
}

#[tokio::test]
async fn test_retreat_without_cache_fetches_previous_page() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(2), linear_page(2, 3, 2), 2).await;
    mount_page(&server, &listing_path(3), linear_page(3, 3, 2), 1).await;

    let mut walker = open(&server, &listing_path(2), None).await;
    let original = walker.records().to_vec();

    assert!(walker.advance().await.unwrap());
    assert!(walker.retreat().await.unwrap());

    // Equal data from a second fetch of page 2; page 3 is not fetched again
    assert_eq!(walker.page_number(), &PageNumber::Numeric(2));
    assert_eq!(walker.records(), original.as_slice());
}

#[tokio::test]
async fn test_boundaries_do_not_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 1, 2), 1).await;

    let mut walker = open(&server, &listing_path(1), None).await;

    assert!(!walker.retreat().await.unwrap());
    assert!(!walker.advance().await.unwrap());
    assert!(walker.current().is_first());
    assert!(walker.current().is_last());
}

#[tokio::test]
async fn test_cache_is_shared_between_walkers() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 2, 3), 1).await;
    mount_page(&server, &listing_path(2), linear_page(2, 2, 3), 1).await;

    let cache = PageCache::new();
    let mut first = open(&server, &listing_path(1), Some(cache.clone())).await;
    let first_records = first.collect_all().await.unwrap();

    let mut second = open(&server, &listing_path(1), Some(cache.clone())).await;
    let second_records = second.collect_all().await.unwrap();

    assert_eq!(first_records, second_records);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_results_are_ordered_by_page_number() {
    let server = MockServer::start().await;
    for n in 1..=3 {
        mount_page(&server, &listing_path(n), linear_page(n, 3, 1), 1).await;
    }

    // Populate the cache out of order: 3, then 2, then 1
    let cache = PageCache::new();
    let mut walker = open(&server, &listing_path(3), Some(cache.clone())).await;
    walker.retreat().await.unwrap();
    walker.retreat().await.unwrap();

    assert_eq!(
        titles(&walker.results()),
        ["Page 1 #1", "Page 2 #1", "Page 3 #1"]
    );
}

#[tokio::test]
async fn test_results_without_cache_are_the_current_page() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 2, 2), 1).await;
    mount_page(&server, &listing_path(2), linear_page(2, 2, 1), 1).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    walker.advance().await.unwrap();

    assert_eq!(titles(&walker.results()), ["Page 2 #1"]);
}

#[tokio::test]
async fn test_loop_back_to_seen_url_ends_sequence() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        &listing_path(1),
        listing_page("1", 2, None, Some(&listing_path(2))),
        1,
    )
    .await;
    mount_page(
        &server,
        &listing_path(2),
        listing_page("2", 2, Some(&listing_path(1)), Some(&listing_path(1))),
        1,
    )
    .await;

    let mut walker = open(&server, &listing_path(1), None).await;
    let records = walker.collect_all().await.unwrap();

    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_repeated_page_number_ends_sequence() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        &listing_path(1),
        listing_page("1", 1, None, Some(&listing_path(2))),
        1,
    )
    .await;
    mount_page(
        &server,
        &listing_path(2),
        listing_page("2", 1, Some(&listing_path(1)), Some(&listing_path(3))),
        1,
    )
    .await;
    // A different URL that claims to be page 1 again
    mount_page(
        &server,
        &listing_path(3),
        listing_page("1", 1, None, Some(&listing_path(4))),
        1,
    )
    .await;
    mount_page(&server, &listing_path(4), linear_page(4, 4, 1), 0).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    let records = walker.collect_all().await.unwrap();

    assert_eq!(titles(&records), ["Page 1 #1", "Page 2 #1"]);
}

#[tokio::test]
async fn test_failed_page_fetch_is_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, &listing_path(1), linear_page(1, 2, 1), 1).await;
    mount_status(&server, &listing_path(2), 500, Duration::ZERO).await;

    let mut walker = open(&server, &listing_path(1), None).await;
    assert!(walker.next_record().await.unwrap().is_some());

    let err = walker.next_record().await.unwrap_err();
    assert!(matches!(err, OtakuError::Fetch(_)));
    assert_eq!(walker.page_number(), &PageNumber::Numeric(1));
}
