//! Top-level build tool errors

use crate::config::ConfigError;
use crate::manifest::ManifestError;
use crate::pool::PoolError;
use cpp_lexer::logging::{codes, Code};
use cpp_lexer::TokenizerError;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildToolError {
    #[error("Invalid directory {path}: {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },

    #[error("Cannot open log file {path}: {message}")]
    LogSetup { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
}

impl BuildToolError {
    pub fn error_code(&self) -> Code {
        match self {
            BuildToolError::InvalidDirectory { .. } => codes::file_processing::NOT_A_DIRECTORY,
            BuildToolError::LogSetup { .. } => codes::system::INITIALIZATION_FAILURE,
            BuildToolError::Config(e) => e.error_code(),
            BuildToolError::Manifest(e) => e.error_code(),
            BuildToolError::Pool(e) => e.error_code(),
            BuildToolError::Tokenizer(e) => e.error_code(),
        }
    }
}
