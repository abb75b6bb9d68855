//! Consolidated log codes and classification system
//!
//! Single source of truth for every code the lexer and the build tool emit,
//! together with the metadata used to classify and describe them.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning, and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Source file and directory access codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const NOT_A_DIRECTORY: Code = Code::new("E013");
}

/// Lexical table, automaton, and scan codes
pub mod lexical {
    use super::Code;

    pub const UNRECOGNIZED_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_LITERAL: Code = Code::new("E021");
    pub const INCOMPLETE_TOKEN: Code = Code::new("E027");
    pub const MISSING_TABLE: Code = Code::new("E028");
    pub const LITERAL_CONFLICT: Code = Code::new("W030");
}

/// Manifest persistence codes
pub mod manifest {
    use super::Code;

    pub const MANIFEST_IO: Code = Code::new("E100");
    pub const MANIFEST_CORRUPT: Code = Code::new("W101");
    pub const UNSUPPORTED_VERSION: Code = Code::new("E102");
    pub const NOT_A_FILE: Code = Code::new("E103");
}

/// Worker pool codes
pub mod pool {
    use super::Code;

    pub const WORKER_PANICKED: Code = Code::new("E110");
}

/// Configuration and invocation codes
pub mod config {
    use super::Code;

    pub const INVALID_CONFIG: Code = Code::new("E120");
    pub const INVALID_ARGUMENTS: Code = Code::new("E121");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const AUTOMATON_BUILT: Code = Code::new("I001");
    pub const FILE_ANALYZED: Code = Code::new("I002");
    pub const MANIFEST_LOADED: Code = Code::new("I003");
    pub const MANIFEST_FLUSHED: Code = Code::new("I004");
    pub const RUN_COMPLETED: Code = Code::new("I005");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[CodeMetadata] = &[
    CodeMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Critical internal error",
        "File a bug report with the build-tool log attached",
    ),
    CodeMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "Tool initialization failure",
        "Check the output directory and log sink configuration",
    ),
    CodeMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        true,
        "Source file not found",
        "Check that the file still exists",
    ),
    CodeMetadata::new(
        "E007",
        "FileProcessing",
        Severity::Medium,
        true,
        "Source file exceeds the maximum size",
        "Split the header or exclude it from analysis",
    ),
    CodeMetadata::new(
        "E010",
        "FileProcessing",
        Severity::Medium,
        true,
        "Source file is not valid UTF-8",
        "Re-encode the file as UTF-8",
    ),
    CodeMetadata::new(
        "E011",
        "FileProcessing",
        Severity::Medium,
        true,
        "I/O error while reading a source file",
        "Check file permissions",
    ),
    CodeMetadata::new(
        "E012",
        "FileProcessing",
        Severity::High,
        false,
        "Invalid path",
        "Pass an existing path",
    ),
    CodeMetadata::new(
        "E013",
        "FileProcessing",
        Severity::High,
        false,
        "Path is not a directory",
        "Pass an existing directory",
    ),
    CodeMetadata::new(
        "E020",
        "Lexical",
        Severity::Low,
        true,
        "Character not recognized by the lexical tables",
        "None; the character is skipped",
    ),
    CodeMetadata::new(
        "E021",
        "Lexical",
        Severity::Low,
        true,
        "Comment or literal not terminated before end of input",
        "Close the comment or literal",
    ),
    CodeMetadata::new(
        "E027",
        "Lexical",
        Severity::Low,
        true,
        "Partial token dropped at a dead end",
        "None; the partial text is skipped",
    ),
    CodeMetadata::new(
        "E028",
        "Lexical",
        Severity::Critical,
        false,
        "Lexical table missing for the requested dialect",
        "Register a base table or a dialect-specific table",
    ),
    CodeMetadata::new(
        "W030",
        "Lexical",
        Severity::Low,
        true,
        "Literal already registered with a different token kind",
        "None; the first registration keeps priority",
    ),
    CodeMetadata::new(
        "E100",
        "Manifest",
        Severity::High,
        false,
        "Manifest could not be written",
        "Check permissions on the output directory",
    ),
    CodeMetadata::new(
        "W101",
        "Manifest",
        Severity::Low,
        true,
        "Manifest unreadable or corrupt",
        "None; every header is re-analyzed this run",
    ),
    CodeMetadata::new(
        "E102",
        "Manifest",
        Severity::Critical,
        false,
        "Manifest written by a newer, incompatible tool version",
        "Upgrade the tool or delete the manifest",
    ),
    CodeMetadata::new(
        "E103",
        "Manifest",
        Severity::Critical,
        false,
        "Manifest path exists but is not a file",
        "Remove the conflicting directory",
    ),
    CodeMetadata::new(
        "E110",
        "WorkerPool",
        Severity::Critical,
        false,
        "Worker thread panicked",
        "File a bug report with the build-tool log attached",
    ),
    CodeMetadata::new(
        "E120",
        "Configuration",
        Severity::High,
        false,
        "Invalid configuration",
        "Fix the configuration file or environment variable",
    ),
    CodeMetadata::new(
        "E121",
        "Configuration",
        Severity::High,
        false,
        "Invalid command-line arguments",
        "Run with SRC_DIR and BIN_DIR",
    ),
    CodeMetadata::new(
        "I001",
        "Success",
        Severity::Low,
        true,
        "Lexical automaton built",
        "None",
    ),
    CodeMetadata::new(
        "I002",
        "Success",
        Severity::Low,
        true,
        "Header analyzed",
        "None",
    ),
    CodeMetadata::new(
        "I003",
        "Success",
        Severity::Low,
        true,
        "Manifest loaded",
        "None",
    ),
    CodeMetadata::new(
        "I004",
        "Success",
        Severity::Low,
        true,
        "Manifest flushed",
        "None",
    ),
    CodeMetadata::new(
        "I005",
        "Success",
        Severity::Low,
        true,
        "Build tool run completed",
        "None",
    ),
];

static REGISTRY: OnceLock<HashMap<&'static str, &'static CodeMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, &'static CodeMetadata> {
    REGISTRY.get_or_init(|| REGISTRY_ENTRIES.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown code")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
