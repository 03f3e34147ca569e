// file: src/webhook/processor.rs
// description: webhook trigger validation and release processing

use crate::config::{MirrorConfig, RepositorySource, WebhookConfig};
use crate::github::{FetchStrategy, GithubFetchFactory};
use crate::mirror::{ArtifactStore, AssetClassifier, FetchFactory, MirrorPipeline, MirrorStats};
use crate::models::ReleaseEvent;
use crate::webhook::signature;
use std::sync::Arc;
use tracing::{info, warn};

pub const RELEASE_EVENT: &str = "release";

const TRACKED_ACTIONS: [&str; 3] = ["created", "published", "edited"];

/// Outcome of one webhook delivery. `Ignored` is success-with-ignored
/// (wrong event or action is not the sender's fault), `Rejected` is a
/// malformed request, `Unauthorized` is a signature failure. The HTTP
/// layer maps these to 200/400/401 so the sender's retry behavior can be
/// driven correctly.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    Ignored(&'static str),
    Rejected(&'static str),
    Unauthorized(&'static str),
    Processed(MirrorStats),
}

pub struct WebhookProcessor<F: FetchFactory = GithubFetchFactory> {
    registry: Vec<RepositorySource>,
    secret: Option<String>,
    classifier: AssetClassifier,
    store: Arc<ArtifactStore>,
    factory: F,
}

impl WebhookProcessor {
    pub fn new(mirror: MirrorConfig, webhook: WebhookConfig, store: Arc<ArtifactStore>) -> Self {
        Self::with_factory(mirror, webhook, store, GithubFetchFactory)
    }
}

impl<F: FetchFactory> WebhookProcessor<F> {
    pub fn with_factory(
        mirror: MirrorConfig,
        webhook: WebhookConfig,
        store: Arc<ArtifactStore>,
        factory: F,
    ) -> Self {
        let classifier = AssetClassifier::new(&mirror);
        Self {
            registry: mirror.repositories,
            secret: webhook.secret,
            classifier,
            store,
            factory,
        }
    }

    /// Validate and process one inbound delivery. The body is parsed only
    /// after the signature is accepted.
    pub async fn handle(
        &self,
        event_type: Option<&str>,
        supplied_signature: Option<&str>,
        body: &[u8],
    ) -> WebhookOutcome {
        match event_type {
            Some(RELEASE_EVENT) => {}
            _ => return WebhookOutcome::Ignored("unsupported event type"),
        }

        if body.is_empty() {
            return WebhookOutcome::Rejected("empty body");
        }

        let Some(supplied_signature) = supplied_signature else {
            return WebhookOutcome::Unauthorized("missing signature");
        };

        let Some(secret) = &self.secret else {
            warn!("Webhook delivery received but no signing secret is configured");
            return WebhookOutcome::Unauthorized("webhook secret not configured");
        };

        if !signature::verify(secret, body, supplied_signature) {
            return WebhookOutcome::Unauthorized("signature mismatch");
        }

        let event: ReleaseEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                warn!("Undecodable webhook payload: {}", e);
                return WebhookOutcome::Rejected("malformed payload");
            }
        };

        if !TRACKED_ACTIONS.contains(&event.action.as_str()) {
            return WebhookOutcome::Ignored("unsupported action");
        }

        if event.release.assets.is_empty() {
            return WebhookOutcome::Ignored("release has no assets");
        }

        info!(
            "Processing {} release {} from {} ({} assets)",
            event.action,
            event.release.tag_name,
            event.repository.full_name,
            event.release.assets.len()
        );

        let strategy = self
            .registry
            .iter()
            .find(|source| source.full_name() == event.repository.full_name)
            .map(FetchStrategy::for_source)
            .unwrap_or(FetchStrategy::Anonymous);

        let fetcher = self.factory.fetcher(strategy);
        let pipeline = MirrorPipeline::new(&self.classifier, &self.store, &fetcher);
        let stats = pipeline.process_assets(&event.release.assets).await;

        WebhookOutcome::Processed(stats)
    }
}
