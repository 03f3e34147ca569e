// file: src/mirror/poller.rs
// description: scheduled poll trigger enumerating recent releases per repository

use crate::config::{MirrorConfig, RepositorySource};
use crate::error::Result;
use crate::github::{FetchStrategy, GithubClient};
use crate::mirror::classifier::AssetClassifier;
use crate::mirror::pipeline::{MirrorPipeline, MirrorStats};
use crate::mirror::store::ArtifactStore;
use crate::models::ReleaseAsset;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

pub struct ReleasePoller {
    config: MirrorConfig,
    classifier: AssetClassifier,
    store: Arc<ArtifactStore>,
}

impl ReleasePoller {
    pub fn new(config: MirrorConfig, store: Arc<ArtifactStore>) -> Self {
        let classifier = AssetClassifier::new(&config);
        Self {
            config,
            classifier,
            store,
        }
    }

    /// One state-free, run-to-completion pass over the registry in
    /// configured order. A failure in one repository never aborts the
    /// others; an empty registry degrades to a logged no-op.
    pub async fn run(&self) -> MirrorStats {
        let mut total = MirrorStats::default();

        if self.config.repositories.is_empty() {
            warn!("No repositories registered, nothing to poll");
            return total;
        }

        for source in &self.config.repositories {
            match self.poll_source(source).await {
                Ok(stats) => {
                    info!(
                        "{}: {} mirrored, {} already present, {} irrelevant, {} failed",
                        source.full_name(),
                        stats.mirrored,
                        stats.skipped_existing,
                        stats.skipped_irrelevant,
                        stats.failed
                    );
                    total.merge(&stats);
                }
                Err(e) => {
                    error!("Polling {} failed: {}", source.full_name(), e);
                }
            }
        }

        total
    }

    async fn poll_source(&self, source: &RepositorySource) -> Result<MirrorStats> {
        let client = GithubClient::new(FetchStrategy::for_source(source));

        let releases = client
            .list_releases(&source.owner, &source.repo, self.config.releases_page_size)
            .await?;

        let assets: Vec<ReleaseAsset> = releases
            .into_iter()
            .flat_map(|release| release.assets)
            .collect();

        info!(
            "{}: {} assets across recent releases",
            source.full_name(),
            assets.len()
        );

        let pipeline = MirrorPipeline::new(&self.classifier, &self.store, &client);
        Ok(pipeline.process_assets(&assets).await)
    }

    /// Scheduler loop for the serve command. Ticks never overlap: the next
    /// tick is delayed while a run is still in flight.
    pub async fn run_forever(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let stats = self.run().await;
            info!(
                "Poll complete: {} mirrored, {} already present, {} failed",
                stats.mirrored, stats.skipped_existing, stats.failed
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_empty_registry_is_a_noop() {
        let config = Config::default_config().mirror;
        let store = Arc::new(ArtifactStore::with_store(Arc::new(InMemory::new())));
        let poller = ReleasePoller::new(config, Arc::clone(&store));

        let stats = poller.run().await;
        assert_eq!(stats, MirrorStats::default());
        assert!(store.list(10).await.unwrap().is_empty());
    }
}
