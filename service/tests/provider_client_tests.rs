//! Integration tests for the news, video and postal-code clients using HTTP stubbing.

mod common;

use chrono::{TimeZone, Utc};
use civicdata_api::providers::{
    GNewsClient, HttpZipLookupClient, NewsClient, ProviderError, VideoClient, YouTubeClient,
    ZipLookupClient,
};
use common::http_mock::MockHttpServer;
use serde_json::json;

// ============================================================================
// GNews
// ============================================================================

#[tokio::test]
async fn news_search_quotes_name_and_keeps_five_headlines() {
    let server = MockHttpServer::start().await;

    let articles: Vec<_> = (1..=7)
        .map(|n| {
            json!({
                "title": format!("Story {n}"),
                "url": format!("https://news.example/{n}"),
                "publishedAt": "2024-02-20T10:00:00Z",
                "source": {"name": "Example Times"}
            })
        })
        .collect();

    server
        .expect_get("/search")
        .with_query("q", "\"Alex Padilla\"")
        .with_query("from", "2024-01-31T00:00:00Z")
        .with_query("apikey", "news-key")
        .respond_with_json(json!({"totalArticles": 42, "articles": articles}))
        .mount()
        .await;

    let client = GNewsClient::new(server.url(), "news-key");
    let from = Utc.with_ymd_and_hms(2024, 1, 31, 15, 30, 0).unwrap();

    let result = client.search("Alex Padilla", from).await.expect("search");

    assert_eq!(result.total_articles, 42);
    assert_eq!(result.headlines.len(), 5);
    assert_eq!(result.headlines[0].title, "Story 1");
    assert_eq!(result.headlines[0].source, "Example Times");
    assert_eq!(result.headlines[0].date, "2024-02-20T10:00:00Z");
}

#[tokio::test]
async fn news_without_key_is_not_configured() {
    let server = MockHttpServer::start().await;
    let client = GNewsClient::new(server.url(), "");

    let result = client.search("Anyone", Utc::now()).await;

    assert!(matches!(result, Err(ProviderError::NotConfigured("GNews"))));
    assert_eq!(server.request_count().await, 0);
}

#[tokio::test]
async fn news_forbidden_passes_status() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/search")
        .respond_with_status(403)
        .with_json_response(json!({"errors": ["quota"]}))
        .mount()
        .await;

    let client = GNewsClient::new(server.url(), "news-key");
    let result = client.search("Anyone", Utc::now()).await;

    assert!(matches!(
        result,
        Err(ProviderError::ApiError { status: 403, .. })
    ));
}

// ============================================================================
// YouTube
// ============================================================================

#[tokio::test]
async fn video_search_drops_items_without_video_id() {
    let server = MockHttpServer::start().await;

    server
        .expect_get("/search")
        .with_query("part", "snippet")
        .with_query("type", "video")
        .with_query("q", "Alex Padilla")
        .with_query("maxResults", "10")
        .with_query("key", "yt-key")
        .respond_with_json(json!({
            "items": [
                {
                    "id": {"videoId": "abc123"},
                    "snippet": {
                        "title": "Floor speech",
                        "channelTitle": "Senate TV",
                        "publishedAt": "2024-02-01T00:00:00Z",
                        "thumbnails": {
                            "default": {"url": "https://img/default.jpg"},
                            "medium": {"url": "https://img/medium.jpg"}
                        }
                    }
                },
                {
                    "id": {"channelId": "UC123"},
                    "snippet": {"title": "A channel"}
                },
                {
                    "id": {"videoId": "def456"},
                    "snippet": {
                        "title": "Interview",
                        "thumbnails": {"default": {"url": "https://img/d2.jpg"}}
                    }
                }
            ]
        }))
        .mount()
        .await;

    let client = YouTubeClient::new(server.url(), "yt-key");
    let videos = client.search("Alex Padilla", 10).await.expect("search");

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_id, "abc123");
    assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
    assert_eq!(videos[0].channel, "Senate TV");
    assert_eq!(videos[0].thumbnail.as_deref(), Some("https://img/medium.jpg"));
    assert_eq!(videos[1].thumbnail.as_deref(), Some("https://img/d2.jpg"));
}

#[tokio::test]
async fn video_without_key_is_not_configured() {
    let server = MockHttpServer::start().await;
    let client = YouTubeClient::new(server.url(), "");

    let result = client.search("Anyone", 10).await;

    assert!(matches!(result, Err(ProviderError::NotConfigured("YouTube"))));
}

#[tokio::test]
async fn video_rate_limit() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/search")
        .respond_with_status(429)
        .mount()
        .await;

    let client = YouTubeClient::new(server.url(), "yt-key");
    let result = client.search("Anyone", 10).await;

    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

// ============================================================================
// Postal-code lookup
// ============================================================================

#[tokio::test]
async fn zip_lookup_returns_results() {
    let server = MockHttpServer::start().await;

    server
        .expect_get("/getall_mems.php")
        .with_query("zip", "94110")
        .with_query("output", "json")
        .respond_with_json(json!({
            "results": [
                {"name": "Nancy Pelosi", "party": "Democrat", "state": "CA", "district": "11",
                 "phone": "202-225-4965", "office": "1236 Longworth", "link": "https://pelosi.house.gov"},
                {"name": "Alex Padilla", "party": "Democrat", "state": "CA"}
            ]
        }))
        .mount()
        .await;

    let client = HttpZipLookupClient::new(server.url());
    let results = client.lookup("94110").await.expect("lookup");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].district, "11");
    assert_eq!(results[1].district, "");
}

#[tokio::test]
async fn zip_lookup_empty_body() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/getall_mems.php")
        .respond_with_json(json!({}))
        .mount()
        .await;

    let client = HttpZipLookupClient::new(server.url());
    let results = client.lookup("00000").await.expect("lookup");

    assert!(results.is_empty());
}

#[tokio::test]
async fn zip_lookup_server_error() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/getall_mems.php")
        .respond_with_status(502)
        .mount()
        .await;

    let client = HttpZipLookupClient::new(server.url());
    let result = client.lookup("94110").await;

    assert!(matches!(
        result,
        Err(ProviderError::ApiError { status: 502, .. })
    ));
}
