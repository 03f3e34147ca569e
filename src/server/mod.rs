// file: src/server/mod.rs
// description: HTTP server module exports
// reference: internal module structure

pub mod routes;

pub use routes::{AppState, router};
