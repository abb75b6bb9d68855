//! A language specification resolved for one dialect

use super::dialect::Dialect;
use super::registry::{MissingTableError, TableRegistry};
use super::rules::{LexicalRule, MatchedPair, TableId};
use crate::tokens::TokenKind;

/// Declarative lexical vocabulary for every dialect of a language
#[derive(Debug, Clone)]
pub struct LanguageSpec {
    registry: TableRegistry,
}

impl LanguageSpec {
    pub fn new(registry: TableRegistry) -> Self {
        Self { registry }
    }

    pub fn cpp() -> Self {
        Self::new(TableRegistry::cpp())
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn resolve(
        &self,
        dialect: Dialect,
        table: TableId,
    ) -> Result<&[LexicalRule], MissingTableError> {
        self.registry.resolve(dialect, table)
    }

    /// Resolve every table the automaton builder consumes
    pub fn for_dialect(&self, dialect: Dialect) -> Result<ResolvedSpec, MissingTableError> {
        ResolvedSpec::for_dialect(&self.registry, dialect)
    }
}

/// A matched pair with its prefix and suffix tables resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatchedPair {
    pub pair: MatchedPair,
    pub prefixes: Vec<&'static str>,
    /// Resolved but never consumed by the scanner
    pub suffixes: Vec<&'static str>,
}

/// Tables for a single dialect, in automaton insertion order
#[derive(Debug, Clone)]
pub struct ResolvedSpec {
    pub dialect: Dialect,
    pub language_keywords: Vec<(&'static str, TokenKind)>,
    pub preprocessor_keywords: Vec<(&'static str, TokenKind)>,
    pub operators: Vec<(&'static str, TokenKind)>,
    pub symbols: Vec<(&'static str, TokenKind)>,
    pub matched_pairs: Vec<ResolvedMatchedPair>,
}

impl ResolvedSpec {
    pub fn for_dialect(
        registry: &TableRegistry,
        dialect: Dialect,
    ) -> Result<Self, MissingTableError> {
        let literals = |table, keyword_kind: fn(&'static str) -> TokenKind| {
            registry.resolve(dialect, table).map(|rules| {
                rules
                    .iter()
                    .filter_map(|rule| rule.literal(keyword_kind))
                    .collect::<Vec<_>>()
            })
        };

        let language_keywords = literals(TableId::LanguageKeywords, TokenKind::Keyword)?;
        let preprocessor_keywords =
            literals(TableId::PreprocessorKeywords, TokenKind::Preprocessor)?;
        let operators = literals(TableId::Operators, TokenKind::Keyword)?;
        let symbols = literals(TableId::Symbols, TokenKind::Keyword)?;

        let matched_pairs = registry
            .resolve(dialect, TableId::MatchedPairs)?
            .iter()
            .filter_map(LexicalRule::matched_pair)
            .map(|pair| ResolvedMatchedPair {
                pair: pair.clone(),
                prefixes: affixes(registry, dialect, pair.prefixes),
                suffixes: affixes(registry, dialect, pair.suffixes),
            })
            .collect();

        Ok(Self {
            dialect,
            language_keywords,
            preprocessor_keywords,
            operators,
            symbols,
            matched_pairs,
        })
    }

    /// Keyword, operator, and symbol literals in insertion order
    pub fn literals(&self) -> impl Iterator<Item = (&'static str, TokenKind)> + '_ {
        self.language_keywords
            .iter()
            .chain(&self.preprocessor_keywords)
            .chain(&self.operators)
            .chain(&self.symbols)
            .copied()
    }
}

/// An affix table that is absent for the dialect means no affixes.
fn affixes(
    registry: &TableRegistry,
    dialect: Dialect,
    table: Option<TableId>,
) -> Vec<&'static str> {
    table
        .and_then(|table| registry.resolve(dialect, table).ok())
        .map(|rules| rules.iter().filter_map(LexicalRule::affix).collect())
        .unwrap_or_default()
}
