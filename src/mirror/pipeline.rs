// file: src/mirror/pipeline.rs
// description: shared classify/probe/transfer pipeline driven by both triggers

use crate::error::Result;
use crate::github::FetchStrategy;
use crate::mirror::classifier::AssetClassifier;
use crate::mirror::store::ArtifactStore;
use crate::models::ReleaseAsset;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::future::Future;
use tracing::{debug, error, info};

pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Seam between the pipeline and the upstream host. The production
/// implementation is `GithubClient`; tests substitute counting fakes.
pub trait AssetFetch {
    fn fetch(&self, asset: &ReleaseAsset) -> impl Future<Output = Result<ByteStream>> + Send;
}

/// Builds a fetcher for a repository's fetch strategy. Lets the webhook
/// trigger pick the credentialed client after the payload names the
/// repository, while keeping the seam testable.
pub trait FetchFactory {
    type Fetcher: AssetFetch;

    fn fetcher(&self, strategy: FetchStrategy) -> Self::Fetcher;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub mirrored: usize,
    pub skipped_existing: usize,
    pub skipped_irrelevant: usize,
    pub failed: usize,
}

impl MirrorStats {
    pub fn merge(&mut self, other: &MirrorStats) {
        self.mirrored += other.mirrored;
        self.skipped_existing += other.skipped_existing;
        self.skipped_irrelevant += other.skipped_irrelevant;
        self.failed += other.failed;
    }
}

pub struct MirrorPipeline<'a, F: AssetFetch> {
    classifier: &'a AssetClassifier,
    store: &'a ArtifactStore,
    fetcher: &'a F,
}

impl<'a, F: AssetFetch> MirrorPipeline<'a, F> {
    pub fn new(classifier: &'a AssetClassifier, store: &'a ArtifactStore, fetcher: &'a F) -> Self {
        Self {
            classifier,
            store,
            fetcher,
        }
    }

    /// Drive a batch of assets through classify, probe, transfer. Failures
    /// are local to one asset; the batch always runs to completion. The
    /// object store is the de-duplication ledger: re-processing the same
    /// asset list is safe and results in no second write.
    pub async fn process_assets(&self, assets: &[ReleaseAsset]) -> MirrorStats {
        let mut stats = MirrorStats::default();

        for asset in assets {
            let Some(channel) = self.classifier.classify(&asset.name) else {
                debug!("Skipping irrelevant asset: {}", asset.name);
                stats.skipped_irrelevant += 1;
                continue;
            };

            let key = self.classifier.storage_key(channel, &asset.name);

            if self.store.exists(&key).await {
                debug!("Already mirrored: {}", key);
                stats.skipped_existing += 1;
                continue;
            }

            match self.transfer(asset, &key).await {
                Ok(written) => {
                    info!("Mirrored {} ({} bytes)", key, written);
                    stats.mirrored += 1;
                }
                Err(e) => {
                    // left unmirrored; the next trigger retries since the
                    // key is still absent
                    error!("Failed to mirror {}: {}", asset.name, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    async fn transfer(&self, asset: &ReleaseAsset, key: &str) -> Result<u64> {
        let stream = self.fetcher.fetch(asset).await?;
        self.store.put_stream(key, stream).await
    }
}
