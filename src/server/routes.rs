// file: src/server/routes.rs
// description: HTTP router serving mirrored artifacts, the listing and the webhook

use crate::config::Config;
use crate::mirror::{ArtifactStore, AssetClassifier};
use crate::webhook::{WebhookOutcome, WebhookProcessor};
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<ArtifactStore>,
    classifier: AssetClassifier,
    webhook: Arc<WebhookProcessor>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<ArtifactStore>) -> Self {
        let classifier = AssetClassifier::new(&config.mirror);
        let webhook = Arc::new(WebhookProcessor::new(
            config.mirror.clone(),
            config.webhook.clone(),
            Arc::clone(&store),
        ));

        Self {
            config: Arc::new(config),
            store,
            classifier,
            webhook,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/api", get(list_objects))
        .route("/github/webhook", post(github_webhook))
        .route("/*name", get(download))
        .with_state(state)
}

async fn landing(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.server.landing_url)
}

async fn list_objects(State(state): State<AppState>) -> Response {
    match state.store.list(state.config.server.list_page_limit).await {
        Ok(objects) => Json(objects).into_response(),
        Err(e) => {
            error!("Object listing failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn download(Path(name): Path<String>, State(state): State<AppState>) -> Response {
    if !state.classifier.is_tracked_name(&name) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let object = match state.store.get(&name).await {
        Ok(Some(object)) => object,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Fetching {} from storage failed: {}", name, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let etag = object.meta.e_tag.clone();
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream");
    if let Some(etag) = etag {
        builder = builder.header(header::ETAG, etag);
    }

    match builder.body(Body::from_stream(object.into_stream())) {
        Ok(response) => response,
        Err(e) => {
            error!("Building response for {} failed: {}", name, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event_type = headers
        .get("x-github-event")
        .and_then(|value| value.to_str().ok());
    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|value| value.to_str().ok());

    if let Some(delivery) = headers
        .get("x-github-delivery")
        .and_then(|value| value.to_str().ok())
    {
        debug!("Webhook delivery {}", delivery);
    }

    match state.webhook.handle(event_type, signature, &body).await {
        WebhookOutcome::Processed(stats) => (
            StatusCode::OK,
            Json(json!({"ok": true, "mirrored": stats.mirrored, "failed": stats.failed})),
        )
            .into_response(),
        WebhookOutcome::Ignored(reason) => (
            StatusCode::OK,
            Json(json!({"ok": true, "ignored": reason})),
        )
            .into_response(),
        WebhookOutcome::Rejected(reason) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": reason})),
        )
            .into_response(),
        WebhookOutcome::Unauthorized(reason) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error": reason})),
        )
            .into_response(),
    }
}
