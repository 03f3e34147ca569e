// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod github;
pub mod mirror;
pub mod models;
pub mod server;
pub mod utils;
pub mod webhook;

pub use config::{
    Config, MirrorConfig, RepositorySource, ServerConfig, StorageConfig, WebhookConfig,
};
pub use error::{MirrorError, Result};
pub use github::{FetchStrategy, GithubClient, GithubFetchFactory};
pub use mirror::{
    ArtifactStore, AssetClassifier, Channel, MirrorPipeline, MirrorStats, ReleasePoller,
};
pub use models::{ObjectSummary, Release, ReleaseAsset, ReleaseEvent};
pub use webhook::{WebhookOutcome, WebhookProcessor};
