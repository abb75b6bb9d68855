//! Dialect-aware C++ lexical analysis
//!
//! Lexical vocabulary is declared as per-dialect tables, compiled into a
//! transition graph, and replayed over header text by a single-pass scanner.

// Internal modules
pub mod automaton;
pub mod config;
pub mod file_processor;
pub mod language;
#[macro_use]
pub mod logging;
pub mod scanner;
pub mod tokenizer;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use automaton::{Automaton, AutomatonBuilder, BuildConflict};
pub use language::{Dialect, LanguageSpec, MissingTableError, TableId, TableRegistry};
pub use scanner::{ScanDiagnostic, ScanOutput, Scanner};
pub use tokenizer::{Tokenizer, TokenizerError};
pub use tokens::{Token, TokenKind};
