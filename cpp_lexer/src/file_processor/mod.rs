//! Source file access for the tokenizer

pub mod processor;

pub use processor::{FileProcessor, FileProcessorError, SourceFile};

use std::path::Path;

/// Read a header with the default size limit
pub fn read_source(path: &Path) -> Result<SourceFile, FileProcessorError> {
    FileProcessor::new().process_file(path)
}
