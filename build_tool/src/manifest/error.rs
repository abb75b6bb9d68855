use super::codec::ManifestVersion;
use cpp_lexer::logging::{codes, Code};
use std::path::PathBuf;

/// Manifest errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Manifest path exists but is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Manifest {path} has version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: ManifestVersion,
        supported: ManifestVersion,
    },

    #[error("Manifest {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Path cannot be stored in the manifest: {path}")]
    UnencodablePath { path: PathBuf },
}

impl ManifestError {
    pub fn error_code(&self) -> Code {
        match self {
            ManifestError::Io { .. } | ManifestError::UnencodablePath { .. } => {
                codes::manifest::MANIFEST_IO
            }
            ManifestError::NotAFile { .. } => codes::manifest::NOT_A_FILE,
            ManifestError::UnsupportedVersion { .. } => codes::manifest::UNSUPPORTED_VERSION,
            ManifestError::Corrupt { .. } => codes::manifest::MANIFEST_CORRUPT,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
