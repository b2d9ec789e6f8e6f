//! End-to-end tests of the top-level client

use crate::common::{
    anime_page, episode_page, linear_page, listing_path, mount_page, test_config,
};
use otakudesu_scraper::client::{DetailOptions, SearchOptions};
use otakudesu_scraper::{OtakuClient, SearchKind};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OtakuClient {
    let mut config = test_config();
    config.client.base_url = format!("{}/", server.uri());
    OtakuClient::new(config).unwrap()
}

fn search_page(server: &MockServer) -> String {
    let base = server.uri();
    format!(
        r#"<html><body><ul class="chivsrc">
          <li>
            <img src="{base}/img/op.jpg" width="100" height="140">
            <h2><a href="{base}/anime/one-piece/">One Piece (Episode 1 – 1100) Subtitle Indonesia</a></h2>
            <div class="set"><b>Genres</b> : <a href="{base}/genres/action/">Action</a></div>
            <div class="set"><b>Status</b> : Ongoing</div>
            <div class="set"><b>Rating</b> : 8.73</div>
          </li>
          <li><h2><a href="{base}/episode/op-1100/">One Piece Episode 1100 Subtitle Indonesia</a></h2></li>
          <li><h2><a href="{base}/batch/op-batch/">One Piece [BATCH] Subtitle Indonesia</a></h2></li>
          <li class="ads"><a href="{base}/ads/">One Piece (1 - 12)</a></li>
        </ul></body></html>"#
    )
}

#[tokio::test]
async fn test_search_sends_query_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "one piece"))
        .and(query_param("post_type", "anime"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server)
        .search("one piece", SearchKind::Anime, &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(results.anime.len(), 1);
    assert_eq!(results.anime[0].get_str("status"), Some("Ongoing"));
    assert_eq!(results.anime[0].get_str("rating"), Some("8.73"));
    assert_eq!(results.episodes.len(), 1);
    assert_eq!(results.episodes[0].get_str("episode"), Some("1100"));
    assert_eq!(results.batch.len(), 1);
}

#[tokio::test]
async fn test_search_all_omits_post_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&server)))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .search("one piece", SearchKind::All, &SearchOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, ["s"]);
}

#[tokio::test]
async fn test_search_with_details_enriches_each_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&server)))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/anime/one-piece/", anime_page("One Piece"), 1).await;
    mount_page(&server, "/episode/op-1100/", episode_page("Episode 1100"), 1).await;

    let options = SearchOptions {
        anime_details: true,
        episode_details: true,
        ..SearchOptions::default()
    };
    let results = client(&server)
        .search("one piece", SearchKind::All, &options)
        .await
        .unwrap();

    assert_eq!(
        results.anime[0].get_str("studio"),
        Some("Toei Animation")
    );
    assert!(results.episodes[0].contains("links"));
    assert!(!results.batch[0].contains("links"));
}

#[tokio::test]
async fn test_ongoing_all_walks_every_page() {
    let server = MockServer::start().await;
    for n in 1..=3 {
        mount_page(&server, &listing_path(n), linear_page(n, 3, 4), 1).await;
    }

    let client = client(&server);
    let releases = client.ongoing_all().await.unwrap();
    assert_eq!(releases.len(), 12);
    assert_eq!(
        releases[0].get("latestUpload").unwrap()["uploadDay"],
        Value::from("Senin")
    );

    // Second traversal is served by the client's cache
    let again = client.ongoing_all().await.unwrap();
    assert_eq!(again, releases);
    assert_eq!(client.page_cache().unwrap().len(), 3);
}

#[tokio::test]
async fn test_schedules_and_anime_list() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/jadwal-rilis/",
        r#"<div class="kglist321"><h2>Kamis</h2><ul>
             <li><a href="/anime/a/">Anime A</a></li></ul></div>
           <div class="kglist321"><h2>Random</h2><ul>
             <li><a href="/anime/b/">Anime B</a></li></ul></div>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(
        &server,
        "/anime-list/",
        r#"<a class="hodebgst" href="/anime/a/">Anime A</a>
           <a class="hodebgst" href="/anime/b/">Anime B</a>"#
            .to_string(),
        1,
    )
    .await;

    let client = client(&server);
    let schedule = client.schedules().await.unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].day, "thursday");
    assert_eq!(schedule[1].day, "random");

    let list = client.anime_list().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].title(), Some("Anime B"));
}

#[tokio::test]
async fn test_anime_page_with_episode_details() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = anime_page("One Piece").replace(
        "</body>",
        &format!(
            r#"<div class="episodelist"><ul><li>
                 <span><a href="{base}/batch/op/">Batch</a></span><span>x</span><span>1 Jan</span>
               </li></ul></div>
               <div class="episodelist"><ul>
                 <li><span><a href="{base}/episode/op-2/">Episode 2</a></span><span>8 Jan</span></li>
                 <li><span><a href="{base}/episode/op-1/">Episode 1</a></span><span>1 Jan</span></li>
               </ul></div></body>"#
        ),
    );
    mount_page(&server, "/anime/one-piece/", page, 1).await;
    mount_page(&server, "/episode/op-1/", episode_page("Episode 1"), 1).await;
    mount_page(&server, "/episode/op-2/", episode_page("Episode 2"), 1).await;

    let options = DetailOptions {
        episode_details: true,
        ..DetailOptions::default()
    };
    let record = client(&server)
        .anime(&format!("{}/anime/one-piece/", base), &options)
        .await
        .unwrap();

    let episodes = record.get("episodes").unwrap().as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["title"], "Episode 1");
    assert_eq!(episodes[0]["details"]["type"], "TV");
    assert_eq!(record.get("batch").unwrap()["title"], "Batch");
}

#[tokio::test]
async fn test_single_detail_pages_without_enrichment() {
    let server = MockServer::start().await;
    mount_page(&server, "/episode/op-1/", episode_page("Episode 1"), 1).await;
    mount_page(
        &server,
        "/batch/op/",
        r#"<h4>One Piece Batch</h4><div class="deskripsi"><p>All episodes.</p></div>"#
            .to_string(),
        1,
    )
    .await;

    let client = client(&server);
    let episode = client
        .episode(
            &format!("{}/episode/op-1/", server.uri()),
            &DetailOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(episode.title(), Some("Episode 1"));
    assert_eq!(episode.get("details").unwrap()["uploader"], "admin");

    let batch = client
        .batch(&format!("{}/batch/op/", server.uri()))
        .await
        .unwrap();
    assert_eq!(batch.get_str("description"), Some("All episodes."));
}
