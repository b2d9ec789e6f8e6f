//! Fetch client tests: user-agent rotation, custom headers and timeouts

use crate::common::{fetcher, mount_status};
use otakudesu_scraper::fetch::RequestOptions;
use otakudesu_scraper::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_with_header(server: &MockServer, page_path: &str, name: &str, value: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .and(header(name, value))
        .respond_with(ResponseTemplate::new(200).set_body_string("matched"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = MockServer::start().await;
    mount_with_header(&server, "/anime/a/", "user-agent", "OtakuTest/1.0").await;

    let body = fetcher()
        .fetch_page(&format!("{}/anime/a/", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "matched");
}

#[tokio::test]
async fn test_per_request_user_agent_overrides_rotation() {
    let server = MockServer::start().await;
    mount_with_header(&server, "/anime/a/", "user-agent", "Override/3.0").await;

    let options = RequestOptions {
        user_agent: Some("Override/3.0".to_string()),
        ..RequestOptions::default()
    };
    let body = fetcher()
        .fetch_with(&format!("{}/anime/a/", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(body, "matched");
}

#[tokio::test]
async fn test_custom_headers_replace_rotated_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anime/a/"))
        .and(header("x-client", "otaku"))
        .and(header("user-agent", "Custom/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("custom"))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-client", HeaderValue::from_static("otaku"));
    headers.insert(USER_AGENT, HeaderValue::from_static("Custom/2.0"));
    let options = RequestOptions {
        headers: Some(headers),
        ..RequestOptions::default()
    };
    let body = fetcher()
        .fetch_with(&format!("{}/anime/a/", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(body, "custom");
}

#[tokio::test]
async fn test_per_request_timeout_overrides_client_timeout() {
    let server = MockServer::start().await;
    mount_status(&server, "/anime/slow/", 200, Duration::from_secs(2)).await;

    let options = RequestOptions {
        timeout: Some(Duration::from_millis(200)),
        ..RequestOptions::default()
    };
    let err = fetcher()
        .fetch_with(&format!("{}/anime/slow/", server.uri()), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout { .. }));
    assert!(err.url().ends_with("/anime/slow/"));
}

#[tokio::test]
async fn test_query_parameters_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "frieren"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher()
        .fetch_with(
            &format!("{}/", server.uri()),
            &RequestOptions::with_query([("s", "frieren")]),
        )
        .await
        .unwrap();

    assert_eq!(body, "results");
}
