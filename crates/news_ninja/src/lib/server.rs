//! HTTP surface over a shared [`Broadcaster`].

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    BroadcastRequest, Broadcaster, DiscussionSource, Error, FeedSource, LanguageModel,
    SpeechSynthesizer,
};

pub const SERVICE_NAME: &str = "NewsNinja API";
pub const AUDIO_FILE_NAME: &str = "news-summary.mp3";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn create_router<F, M, D, S>(broadcaster: Arc<Broadcaster<F, M, D, S>>) -> Router
where
    F: FeedSource + Send + Sync + 'static,
    M: LanguageModel + Send + Sync + 'static,
    D: DiscussionSource + Send + Sync + 'static,
    S: SpeechSynthesizer + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root::<F, M, D, S>))
        .route("/health", get(health::<F, M, D, S>))
        .route("/generate-news-audio", post(generate_news_audio::<F, M, D, S>))
        .layer(CorsLayer::permissive())
        .with_state(broadcaster)
}

async fn root<F, M, D, S>(State(broadcaster): State<Arc<Broadcaster<F, M, D, S>>>) -> Response
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "reddit_available": broadcaster.reddit_available(),
    }))
    .into_response()
}

async fn health<F, M, D, S>(State(broadcaster): State<Arc<Broadcaster<F, M, D, S>>>) -> Response
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    Json(json!({
        "status": "ok",
        "reddit_scraping": broadcaster.reddit_available(),
    }))
    .into_response()
}

async fn generate_news_audio<F, M, D, S>(
    State(broadcaster): State<Arc<Broadcaster<F, M, D, S>>>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Response
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Error::InvalidRequest(rejection.body_text()).into_response(),
    };

    match broadcaster.run(&request).await {
        Ok(broadcast) => (
            [
                (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={AUDIO_FILE_NAME}"),
                ),
            ],
            broadcast.audio,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to generate news audio");
            e.into_response()
        }
    }
}

/// Binds `addr` and serves until interrupted
pub async fn serve<F, M, D, S>(
    addr: SocketAddr,
    broadcaster: Arc<Broadcaster<F, M, D, S>>,
) -> anyhow::Result<()>
where
    F: FeedSource + Send + Sync + 'static,
    M: LanguageModel + Send + Sync + 'static,
    D: DiscussionSource + Send + Sync + 'static,
    S: SpeechSynthesizer + Send + Sync + 'static,
{
    let app = create_router(broadcaster);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}
