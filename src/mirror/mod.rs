// file: src/mirror/mod.rs
// description: mirroring synchronizer module exports
// reference: internal module structure

pub mod classifier;
pub mod pipeline;
pub mod poller;
pub mod store;

pub use classifier::{AssetClassifier, Channel};
pub use pipeline::{AssetFetch, ByteStream, FetchFactory, MirrorPipeline, MirrorStats};
pub use poller::ReleasePoller;
pub use store::ArtifactStore;
