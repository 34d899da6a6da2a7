mod mocks;

use std::{net::SocketAddr, sync::Arc};

use mocks::{
    feed::MockFeed,
    model::MockModel,
    speech::{MockSpeech, AUDIO},
};
use news_ninja::{server::create_router, Article, BroadcasterBuilder};
use serde_json::{json, Value};

async fn spawn_server(model: MockModel) -> SocketAddr {
    let dir = tempfile::tempdir().unwrap().keep();
    let feed = MockFeed::default()
        .with_articles("AI", vec![Article::new("AI breakthrough", "Researchers...")]);

    let broadcaster = BroadcasterBuilder::new(dir)
        .feed(feed)
        .model(model)
        .speech(MockSpeech::default())
        .build();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(Arc::new(broadcaster)))
            .await
            .unwrap();
    });

    addr
}

#[tokio::test]
async fn test_root_reports_service_status() {
    let addr = spawn_server(MockModel::default()).await;

    let body: Value = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({"status": "healthy", "service": "NewsNinja API", "reddit_available": false})
    );
}

#[tokio::test]
async fn test_health_reports_reddit_scraping() {
    let addr = spawn_server(MockModel::default()).await;

    let body: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok", "reddit_scraping": false}));
}

#[tokio::test]
async fn test_generate_returns_mp3_attachment() {
    let addr = spawn_server(MockModel::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/generate-news-audio"))
        .json(&json!({"topics": ["AI"], "source_type": "news"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "audio/mpeg");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=news-summary.mp3"
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), AUDIO);
}

#[tokio::test]
async fn test_generate_rejects_empty_topics() {
    let addr = spawn_server(MockModel::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/generate-news-audio"))
        .json(&json!({"topics": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("at least one topic"));
}

#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let addr = spawn_server(MockModel::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/generate-news-audio"))
        .json(&json!({"topics": ["AI"], "source_type": "tv"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_generate_reports_composition_failure() {
    let addr = spawn_server(MockModel::failing("provider down")).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/generate-news-audio"))
        .json(&json!({"topics": ["AI"]}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("provider down"));
}
