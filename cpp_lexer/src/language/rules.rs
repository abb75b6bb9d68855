//! Declarative lexical rules and the identifiers of the tables holding them

use crate::tokens::TokenKind;
use std::fmt;

/// Tag naming one lexical table. Tables are looked up by `(TableId, dialect)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    PreprocessorKeywords,
    LanguageKeywords,
    Operators,
    Symbols,
    MatchedPairs,
    StringPrefixes,
    CharPrefixes,
    LiteralSuffixes,
}

impl TableId {
    pub fn name(&self) -> &'static str {
        match self {
            TableId::PreprocessorKeywords => "PREPROCESSOR_KEYWORDS",
            TableId::LanguageKeywords => "CPP_KEYWORDS",
            TableId::Operators => "CPP_OPERATORS",
            TableId::Symbols => "CPP_SYMBOLS",
            TableId::MatchedPairs => "CPP_MATCHED_PAIRS",
            TableId::StringPrefixes => "CPP_STRING_PREFIXES",
            TableId::CharPrefixes => "CPP_CHAR_PREFIXES",
            TableId::LiteralSuffixes => "CPP_LITERAL_SUFFIXES",
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A construct delimited by a start and an end sequence, such as a comment
/// or a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub start: &'static str,
    pub end: &'static str,
    pub kind: TokenKind,
    /// Each escape character consumes the next character unconditionally
    pub escapes: &'static [char],
    /// Prefixes absorbed into the same token, e.g. `L` before a string
    pub prefixes: Option<TableId>,
    /// Reserved; suffixes are resolved but not consumed
    pub suffixes: Option<TableId>,
    /// End of input completes the construct instead of leaving it open
    pub closes_at_eof: bool,
}

impl MatchedPair {
    pub const fn new(start: &'static str, end: &'static str, kind: TokenKind) -> Self {
        Self {
            start,
            end,
            kind,
            escapes: &[],
            prefixes: None,
            suffixes: None,
            closes_at_eof: false,
        }
    }

    pub const fn with_escapes(mut self, escapes: &'static [char]) -> Self {
        self.escapes = escapes;
        self
    }

    pub const fn with_prefixes(mut self, table: TableId) -> Self {
        self.prefixes = Some(table);
        self
    }

    pub const fn with_suffixes(mut self, table: TableId) -> Self {
        self.suffixes = Some(table);
        self
    }

    pub const fn closing_at_eof(mut self) -> Self {
        self.closes_at_eof = true;
        self
    }
}

/// One entry of a lexical table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalRule {
    Keyword(&'static str),
    Operator {
        text: &'static str,
        label: &'static str,
    },
    Symbol {
        text: &'static str,
        label: &'static str,
    },
    MatchedPair(MatchedPair),
    /// A prefix or suffix string referenced by a matched pair
    Affix(&'static str),
}

impl LexicalRule {
    /// Literal text and token kind for keyword, operator, and symbol rules.
    /// `keyword_kind` picks between language and preprocessor keywords.
    pub fn literal(
        &self,
        keyword_kind: fn(&'static str) -> TokenKind,
    ) -> Option<(&'static str, TokenKind)> {
        match *self {
            LexicalRule::Keyword(word) => Some((word, keyword_kind(word))),
            LexicalRule::Operator { text, label } => Some((text, TokenKind::Operator(label))),
            LexicalRule::Symbol { text, label } => Some((text, TokenKind::Symbol(label))),
            LexicalRule::MatchedPair(_) | LexicalRule::Affix(_) => None,
        }
    }

    pub fn affix(&self) -> Option<&'static str> {
        match *self {
            LexicalRule::Affix(text) => Some(text),
            _ => None,
        }
    }

    pub fn matched_pair(&self) -> Option<&MatchedPair> {
        match self {
            LexicalRule::MatchedPair(pair) => Some(pair),
            _ => None,
        }
    }
}
