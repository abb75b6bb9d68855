//! # build_tool
//!
//! Incremental pre-compilation analysis of C++ headers. Changed headers are
//! tokenized on a worker pool, the component classes they declare are
//! extracted, and the results are persisted in a versioned manifest.

pub mod components;
pub mod config;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod pool;

#[cfg(feature = "cli")]
pub mod cli;

// Convenience re-exports
pub use components::extract_components;
pub use config::{BuildToolConfig, ConfigError, RunSettings};
pub use error::BuildToolError;
pub use manifest::{Manifest, ManifestEntry, ManifestError, ManifestVersion};
pub use orchestrator::{verify_dir, Orchestrator, RunSummary};
pub use pool::{PoolError, PoolReport, WorkerPool};
