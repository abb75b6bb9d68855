//! Recoverable findings reported while scanning

use crate::logging::{codes, Code};
use crate::tokens::TokenKind;
use crate::utils::Span;

/// Input the scanner skipped or dropped. No token is produced for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanDiagnostic {
    #[error("Unrecognized character {ch:?} at {span}")]
    UnrecognizedCharacter { ch: char, span: Span },

    #[error("Unterminated {} starting at {}", .kind.category(), .span.start)]
    UnterminatedLiteral { kind: TokenKind, span: Span },

    #[error("Incomplete token '{text}' at {span}")]
    IncompleteToken { text: String, span: Span },
}

impl ScanDiagnostic {
    pub fn error_code(&self) -> Code {
        match self {
            ScanDiagnostic::UnrecognizedCharacter { .. } => codes::lexical::UNRECOGNIZED_CHARACTER,
            ScanDiagnostic::UnterminatedLiteral { .. } => codes::lexical::UNTERMINATED_LITERAL,
            ScanDiagnostic::IncompleteToken { .. } => codes::lexical::INCOMPLETE_TOKEN,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ScanDiagnostic::UnrecognizedCharacter { span, .. }
            | ScanDiagnostic::UnterminatedLiteral { span, .. }
            | ScanDiagnostic::IncompleteToken { span, .. } => *span,
        }
    }
}
