//! Token kinds and tokens produced by the scanner

use crate::config::compile_time::lexical::TOKEN_PREVIEW_LENGTH;
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// Classification of a lexeme.
///
/// Keyword, operator, and symbol variants carry the static label from the
/// lexical table that produced them, e.g. `Keyword("class")` or
/// `Operator("OP_SCOPE")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Programmer-chosen name
    Identifier,
    Keyword(&'static str),
    Preprocessor(&'static str),
    Operator(&'static str),
    Symbol(&'static str),
    Comment,
    CharLiteral,
    StringLiteral,
    NumberLiteral,
}

impl TokenKind {
    /// Category name used in diagnostics and token dumps
    pub fn category(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword(_) => "KEYWORD",
            TokenKind::Preprocessor(_) => "PREPROCESSOR",
            TokenKind::Operator(_) => "OPERATOR",
            TokenKind::Symbol(_) => "SYMBOL",
            TokenKind::Comment => "COMMENT",
            TokenKind::CharLiteral => "LITERAL_CHAR",
            TokenKind::StringLiteral => "LITERAL_STRING",
            TokenKind::NumberLiteral => "LITERAL_NUMBER",
        }
    }

    /// Table label for keyword, operator, and symbol kinds
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword(label)
            | TokenKind::Preprocessor(label)
            | TokenKind::Operator(label)
            | TokenKind::Symbol(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == word)
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}({})", self.category(), label),
            None => write!(f, "{}", self.category()),
        }
    }
}

/// One lexeme with its kind and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Text shortened for log lines
    pub fn preview(&self) -> String {
        if self.text.chars().count() <= TOKEN_PREVIEW_LENGTH {
            self.text.clone()
        } else {
            let head: String = self.text.chars().take(TOKEN_PREVIEW_LENGTH - 3).collect();
            format!("{}...", head)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Token: {} - \"{}\")", self.kind.category(), self.preview())
    }
}
