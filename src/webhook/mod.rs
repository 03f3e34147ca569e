// file: src/webhook/mod.rs
// description: webhook trigger module exports
// reference: internal module structure

pub mod processor;
pub mod signature;

pub use processor::{RELEASE_EVENT, WebhookOutcome, WebhookProcessor};
