//! TMDB API client tests
//!
//! Tests request shape, response caching, list parsing and error handling
//! against a mock server.

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use binj::api::{RequestError, TimeWindow, TmdbClient};
use binj::models::MediaType;

const POPULAR_BODY: &str = r#"{
    "page": 1,
    "results": [
        {
            "id": 438631,
            "title": "Dune",
            "release_date": "2021-09-15",
            "overview": "Paul Atreides",
            "poster_path": "/dune.jpg",
            "backdrop_path": "/dune-bg.jpg",
            "vote_average": 7.8
        },
        {
            "id": 693134,
            "title": "Dune : Deuxième partie",
            "release_date": "2024-02-27",
            "poster_path": "/dune2.jpg",
            "vote_average": 8.2
        }
    ],
    "total_pages": 500,
    "total_results": 10000
}"#;

fn client(server: &Server) -> TmdbClient {
    TmdbClient::with_base_url("test_key", "test_token", server.url())
}

fn base_query() -> Vec<Matcher> {
    vec![
        Matcher::UrlEncoded("api_key".into(), "test_key".into()),
        Matcher::UrlEncoded("language".into(), "fr-FR".into()),
    ]
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_sends_api_key_language_and_bearer() {
    let mut server = Server::new_async().await;

    let mut query = base_query();
    query.push(Matcher::UrlEncoded("page".into(), "2".into()));
    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::AllOf(query))
        .match_header("authorization", "Bearer test_token")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(POPULAR_BODY)
        .create_async()
        .await;

    let page = client(&server).popular_movies(2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.total_pages, 500);
    assert_eq!(page.results[0].display_title(), "Dune");
}

#[tokio::test]
async fn test_falsy_params_are_not_sent() {
    let mut server = Server::new_async().await;

    // page=0 is dropped: the query carries only the fixed parameters
    let mock = server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::Exact("api_key=test_key&language=fr-FR".into()))
        .with_status(200)
        .with_body(r#"{"page": 1, "results": []}"#)
        .create_async()
        .await;

    let page = client(&server).popular_tv(0).await.unwrap();

    mock.assert_async().await;
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_trending_uses_time_window_path() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::AllOf(base_query()))
        .with_status(200)
        .with_body(POPULAR_BODY)
        .create_async()
        .await;

    let page = client(&server)
        .trending_movies(TimeWindow::Week)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.results[1].id, 693134);
}

#[tokio::test]
async fn test_search_multi_keeps_media_type_tags() {
    let mut server = Server::new_async().await;

    let mut query = base_query();
    query.push(Matcher::UrlEncoded("query".into(), "batman".into()));
    query.push(Matcher::UrlEncoded("page".into(), "1".into()));
    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::AllOf(query))
        .with_status(200)
        .with_body(
            r#"{
                "page": 1,
                "results": [
                    {"id": 414906, "media_type": "movie", "title": "The Batman", "poster_path": "/b.jpg"},
                    {"id": 2098, "media_type": "tv", "name": "Batman", "poster_path": "/tv.jpg"},
                    {"id": 3894, "media_type": "person", "name": "Christian Bale"},
                    {"id": 9, "media_type": "collection", "name": "Batman Collection"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let page = client(&server).search_multi("  batman ", 1).await.unwrap();

    mock.assert_async().await;
    let types: Vec<Option<MediaType>> = page.results.iter().map(|i| i.media_type).collect();
    assert_eq!(
        types,
        vec![
            Some(MediaType::Movie),
            Some(MediaType::Tv),
            Some(MediaType::Person),
            Some(MediaType::Other),
        ]
    );
}

#[tokio::test]
async fn test_blank_search_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let page = client(&server).search_multi("   ", 1).await.unwrap();

    mock.assert_async().await;
    assert!(page.results.is_empty());
}

// =============================================================================
// Cache
// =============================================================================

#[tokio::test]
async fn test_identical_requests_hit_cache() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(POPULAR_BODY)
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let params = [("page", "1".to_string())];
    let first = client.request("/movie/popular", &params).await.unwrap();
    let second = client.request("/movie/popular", &params).await.unwrap();

    mock.assert_async().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(client.cached_responses(), 1);
}

#[tokio::test]
async fn test_different_params_are_cached_separately() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(POPULAR_BODY)
        .expect(2)
        .create_async()
        .await;

    let client = client(&server);
    client.popular_movies(1).await.unwrap();
    client.popular_movies(2).await.unwrap();
    client.popular_movies(1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(client.cached_responses(), 2);
}

#[tokio::test]
async fn test_stale_entries_are_refetched() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(POPULAR_BODY)
        .expect(2)
        .create_async()
        .await;

    let client = client(&server).with_cache_ttl(Duration::from_millis(50));
    client.popular_tv(1).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    client.popular_tv(1).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let client = client(&server);
    assert!(client.popular_movies(1).await.is_err());
    assert!(client.popular_movies(1).await.is_err());

    mock.assert_async().await;
    assert_eq!(client.cached_responses(), 0);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_status_error_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "not found"}"#)
        .create_async()
        .await;

    let err = client(&server).movie_details(999999).await.unwrap_err();

    assert!(matches!(err, RequestError::Status(404)));
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Erreur API: 404");
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/trending/movie/day")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server)
        .trending_movies(TimeWindow::Day)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn test_configured_timeout_applies() {
    // Accepts connections but never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let client = TmdbClient::with_base_url("k", "t", url)
        .with_timeout(Duration::from_millis(100))
        .unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), client.popular_movies(1))
        .await
        .expect("request should time out on its own")
        .unwrap_err();

    match err {
        RequestError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected a transport timeout, got {:?}", other),
    }
    assert_eq!(client.cached_responses(), 0);
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server).popular_movies(1).await.unwrap_err();
    assert!(matches!(err, RequestError::InvalidResponse(_)));
}

// =============================================================================
// Details & Videos
// =============================================================================

#[tokio::test]
async fn test_movie_details_appends_sub_resources() {
    let mut server = Server::new_async().await;

    let mut query = base_query();
    query.push(Matcher::UrlEncoded(
        "append_to_response".into(),
        "videos,credits,similar".into(),
    ));
    let mock = server
        .mock("GET", "/movie/438631")
        .match_query(Matcher::AllOf(query))
        .with_status(200)
        .with_body(
            r#"{
                "id": 438631,
                "title": "Dune",
                "release_date": "2021-09-15",
                "runtime": 155,
                "budget": 165000000,
                "revenue": 402027830,
                "genres": [{"id": 878, "name": "Science-Fiction"}],
                "original_language": "en",
                "credits": {"cast": [{"name": "Timothée Chalamet", "character": "Paul"}]},
                "videos": {"results": [{"key": "abc", "site": "YouTube", "type": "Trailer"}]}
            }"#,
        )
        .create_async()
        .await;

    let detail = client(&server).movie_details(438631).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.display_title(), "Dune");
    assert_eq!(detail.runtime, Some(155));
    assert_eq!(detail.genres[0].name, "Science-Fiction");
    assert_eq!(detail.credits.unwrap().cast[0].name, "Timothée Chalamet");
    assert_eq!(detail.videos.unwrap().results[0].kind, "Trailer");
}

#[tokio::test]
async fn test_tv_details_route() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/tv/94605")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"id": 94605, "name": "Arcane", "first_air_date": "2021-11-06",
                "episode_run_time": [40], "number_of_seasons": 2, "number_of_episodes": 18}"#,
        )
        .create_async()
        .await;

    let detail = client(&server).details(MediaType::Tv, 94605).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.display_title(), "Arcane");
    assert_eq!(detail.display_date(), Some("2021-11-06"));
    assert_eq!(detail.number_of_seasons, Some(2));
}

#[tokio::test]
async fn test_trailer_picks_youtube_trailer() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/438631/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"key": "feat", "name": "Featurette", "site": "YouTube", "type": "Featurette"},
                {"key": "vim", "name": "Vimeo trailer", "site": "Vimeo", "type": "Trailer"},
                {"key": "n9xhJrPXop4", "name": "Bande-annonce VF", "site": "YouTube", "type": "Trailer"}
            ]}"#,
        )
        .create_async()
        .await;

    let video = client(&server)
        .trailer(MediaType::Movie, 438631)
        .await
        .unwrap();

    assert_eq!(video.key, "n9xhJrPXop4");
    assert_eq!(
        video.youtube_url(),
        "https://www.youtube.com/embed/n9xhJrPXop4?autoplay=1&rel=0&modestbranding=1"
    );
}

#[tokio::test]
async fn test_trailer_lookup_failure_is_none() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/tv/1/videos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    assert!(client(&server).trailer(MediaType::Tv, 1).await.is_none());
}
