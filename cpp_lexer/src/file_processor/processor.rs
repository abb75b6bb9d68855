//! Header reading with size and encoding checks

use crate::config::constants::compile_time::file_processing::MAX_SOURCE_FILE_SIZE;
use crate::logging::codes;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File processor specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("File too large: {path} is {size} bytes (max: {max_size})")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("I/O error reading {path}: {message}")]
    IoError { path: PathBuf, message: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::NotAFile { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileProcessorError::FileNotFound { path }
            | FileProcessorError::NotAFile { path }
            | FileProcessorError::FileTooLarge { path, .. }
            | FileProcessorError::InvalidEncoding { path }
            | FileProcessorError::IoError { path, .. } => path,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            ErrorKind::NotFound => FileProcessorError::FileNotFound { path },
            ErrorKind::InvalidData => FileProcessorError::InvalidEncoding { path },
            _ => FileProcessorError::IoError {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// Contents of a header together with the metadata read alongside it
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFile {
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}

/// Reads headers up to a maximum size
#[derive(Debug, Clone, Copy)]
pub struct FileProcessor {
    max_size: u64,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            max_size: MAX_SOURCE_FILE_SIZE,
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn process_file(&self, path: &Path) -> Result<SourceFile, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| FileProcessorError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(FileProcessorError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        if metadata.len() > self.max_size {
            return Err(FileProcessorError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max_size: self.max_size,
            });
        }

        let source = fs::read_to_string(path).map_err(|e| FileProcessorError::from_io(path, e))?;

        Ok(SourceFile {
            path: path.to_path_buf(),
            source,
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_reads_header_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.h");
        fs::write(&path, "class FooComponent {};\n").unwrap();

        let file = FileProcessor::new().process_file(&path).unwrap();
        assert_eq!(file.source, "class FooComponent {};\n");
        assert_eq!(file.size, 23);
        assert_eq!(file.line_count(), 1);
        assert!(file.modified.is_some());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = FileProcessor::new()
            .process_file(&dir.path().join("missing.h"))
            .unwrap_err();
        assert_matches!(err, FileProcessorError::FileNotFound { .. });
        assert_eq!(err.error_code(), codes::file_processing::FILE_NOT_FOUND);
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        assert_matches!(
            FileProcessor::new().process_file(dir.path()),
            Err(FileProcessorError::NotAFile { .. })
        );
    }

    #[test]
    fn test_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.h");
        fs::write(&path, "int x;").unwrap();

        assert_matches!(
            FileProcessor::new().with_max_size(3).process_file(&path),
            Err(FileProcessorError::FileTooLarge { size: 6, max_size: 3, .. })
        );
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.h");
        fs::write(&path, [0x63, 0xff, 0xfe]).unwrap();

        let err = FileProcessor::new().process_file(&path).unwrap_err();
        assert_matches!(err, FileProcessorError::InvalidEncoding { .. });
        assert_eq!(err.path(), path.as_path());
    }
}
