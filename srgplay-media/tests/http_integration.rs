//! Integration tests for the reqwest-backed client and the full pipeline
//!
//! Run with: cargo test --test http_integration

use srgplay_media::{
    config::{ApiConfig, HttpConfig},
    playable::ManifestType,
    Config, FetchError, HttpClient, HttpFetch, ResolveError, SelectionPreference, StreamResolver,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HD: SelectionPreference = SelectionPreference {
    prefer_hd: true,
    audio: false,
};

fn client() -> HttpClient {
    HttpClient::new(&HttpConfig::default()).expect("Failed to build client")
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api: ApiConfig {
            integration_layer_url: Some(format!("{}/integrationlayer/2.0/", server.uri())),
            token_url: Some(format!("{}/akahd/token", server.uri())),
            ..ApiConfig::default()
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn test_open_url_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .mount(&server)
        .await;

    let body = client()
        .open_url(&format!("{}/hello", server.uri()), true)
        .await
        .unwrap();
    assert_eq!(body, "hello world");
}

#[tokio::test]
async fn test_open_url_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client()
        .open_url(&format!("{}/missing", server.uri()), false)
        .await
        .unwrap_err();
    match err {
        FetchError::Http { status, url } => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert!(url.ends_with("/missing"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_resolve_stream_end_to_end() {
    let server = MockServer::start().await;
    let stream_url = format!("{}/i/vod/hd.m3u8", server.uri());
    let composition = serde_json::json!({
        "chapterUrn": "urn:srf:video:abc123",
        "episode": {"title": "Tagesschau"},
        "chapterList": [{
            "id": "abc123",
            "resourceList": [
                {"protocol": "HLS", "quality": "SD", "url": format!("{}/i/vod/sd.m3u8", server.uri())},
                {"protocol": "HLS", "quality": "HD", "url": stream_url}
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/integrationlayer/2.0/mediaComposition/byUrn/urn:srf:video:abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(composition))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/akahd/token"))
        .and(query_param("acl", "/i/vod/*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"token": {"authparams": "hdnts=exp=1~hmac=ff"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = StreamResolver::from_config(&config_for(&server)).unwrap();
    let item = resolver.resolve_stream("abc123", &HD).await.unwrap();

    assert_eq!(item.title, "Tagesschau");
    assert_eq!(item.manifest_type, ManifestType::Hls);
    assert_eq!(item.url, format!("{stream_url}?hdnts=exp=1~hmac=ff"));
    assert!(item.license.is_none());
}

#[tokio::test]
async fn test_resolve_stream_composition_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = StreamResolver::from_config(&config_for(&server)).unwrap();
    let err = resolver.resolve_stream("abc123", &HD).await.unwrap_err();
    assert!(matches!(err, ResolveError::Fetch(FetchError::Http { .. })));
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_open_url_malformed_url_is_network_error() {
    let err = client().open_url("not a url", false).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
