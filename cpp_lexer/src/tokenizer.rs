//! Thread-shareable tokenizer facade
//!
//! The automaton for the configured dialect is built on first use and then
//! shared read-only by every caller. A failed build is not cached, so the
//! next call tries again.

use crate::automaton::Automaton;
use crate::file_processor::{read_source, FileProcessorError};
use crate::language::{Dialect, LanguageSpec, MissingTableError};
use crate::logging::{codes, Code, LogEvent, LoggingService};
use crate::scanner::{ScanOutput, Scanner};
use crate::{log_debug, log_error, log_success, log_warning};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizerError {
    #[error(transparent)]
    Io(#[from] FileProcessorError),

    #[error("Cannot build automaton: {0}")]
    MissingTable(#[from] MissingTableError),
}

impl TokenizerError {
    pub fn error_code(&self) -> Code {
        match self {
            TokenizerError::Io(error) => error.error_code(),
            TokenizerError::MissingTable(error) => error.error_code(),
        }
    }
}

pub struct Tokenizer {
    spec: LanguageSpec,
    dialect: Dialect,
    logger: Arc<LoggingService>,
    automaton: OnceLock<Automaton>,
    build_lock: Mutex<()>,
}

impl Tokenizer {
    /// C++ tokenizer for `dialect`
    pub fn new(dialect: Dialect, logger: Arc<LoggingService>) -> Self {
        Self::with_spec(LanguageSpec::cpp(), dialect, logger)
    }

    pub fn with_spec(spec: LanguageSpec, dialect: Dialect, logger: Arc<LoggingService>) -> Self {
        Self {
            spec,
            dialect,
            logger,
            automaton: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The shared automaton, building it if no caller has yet
    pub fn automaton(&self) -> Result<&Automaton, TokenizerError> {
        if let Some(automaton) = self.automaton.get() {
            return Ok(automaton);
        }

        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(automaton) = self.automaton.get() {
            return Ok(automaton);
        }

        let automaton = self.build()?;
        Ok(self.automaton.get_or_init(|| automaton))
    }

    pub fn tokenize_str(&self, text: &str) -> Result<ScanOutput, TokenizerError> {
        let automaton = self.automaton()?;
        Ok(Scanner::new(automaton).scan(text))
    }

    /// Read and tokenize one header. Scan diagnostics are logged at debug
    /// level and returned with the tokens.
    pub fn tokenize_file(&self, path: &Path) -> Result<ScanOutput, TokenizerError> {
        let automaton = self.automaton()?;
        let file = read_source(path)?;
        let output = Scanner::new(automaton).scan(&file.source);

        let display = path.display();
        for diagnostic in &output.diagnostics {
            let event = LogEvent::debug_with_code(diagnostic.error_code(), &diagnostic.to_string())
                .with_span(diagnostic.span())
                .with_context("file", &display.to_string());
            self.logger.log_event(event);
        }
        log_debug!(self.logger, "Tokenized header",
            "file" => display,
            "tokens" => output.tokens.len(),
            "diagnostics" => output.diagnostics.len());

        Ok(output)
    }

    fn build(&self) -> Result<Automaton, TokenizerError> {
        let automaton = match Automaton::for_dialect(self.spec.registry(), self.dialect) {
            Ok(automaton) => automaton,
            Err(error) => {
                log_error!(self.logger, error.error_code(), &error.to_string(),
                    "dialect" => self.dialect);
                return Err(error.into());
            }
        };

        for conflict in automaton.conflicts() {
            log_warning!(self.logger, code = conflict.error_code(), &conflict.to_string(),
                "dialect" => self.dialect);
        }
        log_success!(self.logger, codes::success::AUTOMATON_BUILT, "Lexical automaton built",
            "dialect" => self.dialect,
            "nodes" => automaton.len(),
            "conflicts" => automaton.conflicts().len());

        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::TableRegistry;
    use crate::logging::LogLevel;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_automaton_is_built_once_under_contention() {
        let (service, memory) = LoggingService::in_memory(LogLevel::Debug);
        let tokenizer = Tokenizer::new(Dialect::Cpp14, Arc::new(service));
        let text = "class WidgetComponent : public Base {};";

        let outputs: Vec<ScanOutput> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| tokenizer.tokenize_str(text).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(
            memory
                .get_events_with_code(codes::success::AUTOMATON_BUILT)
                .len(),
            1
        );
    }

    #[test]
    fn test_table_conflicts_are_logged_as_warnings() {
        let (service, memory) = LoggingService::in_memory(LogLevel::Debug);
        let tokenizer = Tokenizer::new(Dialect::Cpp11, Arc::new(service));
        tokenizer.automaton().unwrap();

        let conflicts = memory.get_events_with_code(codes::lexical::LITERAL_CONFLICT);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|event| event.is_warning()));
    }

    #[test]
    fn test_missing_table_is_retried() {
        let (service, memory) = LoggingService::in_memory(LogLevel::Debug);
        let tokenizer = Tokenizer::with_spec(
            LanguageSpec::new(TableRegistry::new()),
            Dialect::Cpp14,
            Arc::new(service),
        );

        assert_matches!(
            tokenizer.tokenize_str("int x;"),
            Err(TokenizerError::MissingTable(_))
        );
        assert_matches!(
            tokenizer.tokenize_str("int x;"),
            Err(TokenizerError::MissingTable(_))
        );
        assert_eq!(
            memory
                .get_events_with_code(codes::lexical::MISSING_TABLE)
                .len(),
            2
        );
    }

    #[test]
    fn test_tokenize_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget.h");
        std::fs::write(&path, "class WidgetComponent; @").unwrap();

        let (service, memory) = LoggingService::in_memory(LogLevel::Debug);
        let tokenizer = Tokenizer::new(Dialect::Cpp14, Arc::new(service));
        let output = tokenizer.tokenize_file(&path).unwrap();

        assert_eq!(output.tokens[0].kind, TokenKind::Keyword("class"));
        assert_eq!(output.tokens[1].text, "WidgetComponent");
        assert_eq!(output.diagnostics.len(), 1);
        let events = memory.get_events_with_code(codes::lexical::UNRECOGNIZED_CHARACTER);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].span.map(|span| span.start.column), Some(24));
    }

    #[test]
    fn test_tokenize_missing_file() {
        let dir = tempdir().unwrap();
        let tokenizer = Tokenizer::new(Dialect::Cpp14, Arc::new(LoggingService::disabled()));

        let err = tokenizer
            .tokenize_file(&dir.path().join("gone.h"))
            .unwrap_err();
        assert_matches!(err, TokenizerError::Io(FileProcessorError::FileNotFound { .. }));
        assert_eq!(err.error_code(), codes::file_processing::FILE_NOT_FOUND);
    }
}
