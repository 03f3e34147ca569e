// file: src/mirror/store.rs
// description: object store wrapper with existence probes and streaming writes
// reference: https://docs.rs/object_store

use crate::error::{MirrorError, Result};
use crate::models::{ObjectChecksums, ObjectSummary};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{GetResult, ObjectStore, parse_url};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

/// Artifact storage keyed by `<channel>/<filename>` paths. The store is the
/// only shared mutable resource in the system; there is no in-process
/// caching layer, so every probe is a fresh round trip.
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    prefix: Path,
}

impl ArtifactStore {
    /// Build a store from a URL such as `file:///var/lib/release-mirror`,
    /// `s3://bucket/prefix` or `memory:///`.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| MirrorError::Config(format!("Invalid storage url {}: {}", url, e)))?;
        let (store, prefix) = parse_url(&parsed)?;

        Ok(Self {
            store: Arc::from(store),
            prefix,
        })
    }

    /// Wrap an existing backend. Used by tests with an in-memory store.
    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: Path::default(),
        }
    }

    fn location(&self, key: &str) -> Path {
        self.prefix
            .parts()
            .chain(Path::from(key).parts())
            .collect()
    }

    fn relative_key(&self, location: &Path) -> String {
        match location.prefix_match(&self.prefix) {
            Some(parts) => parts
                .map(|part| part.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("/"),
            None => location.to_string(),
        }
    }

    /// Metadata-only existence probe. A probe failure reads as "absent" so
    /// a transient storage error causes an extra idempotent transfer
    /// attempt rather than a missed one.
    pub async fn exists(&self, key: &str) -> bool {
        let location = self.location(key);

        match self.store.head(&location).await {
            Ok(_) => true,
            Err(object_store::Error::NotFound { .. }) => false,
            Err(e) => {
                warn!("Existence probe failed for {}, treating as absent: {}", key, e);
                false
            }
        }
    }

    /// Stream a body into the store without buffering the whole artifact.
    /// Returns the number of bytes written.
    pub async fn put_stream<S>(&self, key: &str, mut stream: S) -> Result<u64>
    where
        S: Stream<Item = Result<Bytes>> + Unpin,
    {
        let location = self.location(key);
        let mut writer = BufWriter::new(Arc::clone(&self.store), location);
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    written += bytes.len() as u64;
                    writer.write_all(&bytes).await?;
                }
                Err(e) => {
                    if let Err(abort_err) = writer.abort().await {
                        warn!("Failed to abort upload for {}: {}", key, abort_err);
                    }
                    return Err(e);
                }
            }
        }

        writer.shutdown().await?;
        debug!("Stored {} ({} bytes)", key, written);
        Ok(written)
    }

    /// List mirrored objects, bounded by `limit`.
    pub async fn list(&self, limit: usize) -> Result<Vec<ObjectSummary>> {
        let prefix = if self.prefix.parts().next().is_none() {
            None
        } else {
            Some(self.prefix.clone())
        };

        let mut stream = self.store.list(prefix.as_ref());
        let mut summaries = Vec::new();

        while let Some(meta) = stream.next().await {
            let meta = meta?;
            summaries.push(ObjectSummary {
                storage_class: None,
                uploaded: meta.last_modified,
                checksums: ObjectChecksums {
                    etag: meta.e_tag.clone(),
                },
                size: meta.size,
                key: self.relative_key(&meta.location),
            });

            if summaries.len() >= limit {
                break;
            }
        }

        Ok(summaries)
    }

    /// Fetch an object for serving. Returns `None` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<GetResult>> {
        let location = self.location(key);

        match self.store.get(&location).await {
            Ok(result) => Ok(Some(result)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
