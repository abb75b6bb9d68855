//! Tagged lookup of lexical tables by `(TableId, dialect)`

use super::dialect::Dialect;
use super::rules::{LexicalRule, TableId};
use crate::logging::{codes, Code};
use std::collections::HashMap;

/// No dialect-specific variant and no base definition exists for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{table} is not defined for {dialect}, any older dialect, or as a base table")]
pub struct MissingTableError {
    pub table: TableId,
    pub dialect: Dialect,
}

impl MissingTableError {
    pub fn error_code(&self) -> Code {
        codes::lexical::MISSING_TABLE
    }
}

type TableKey = (TableId, Option<Dialect>);

/// Lexical tables keyed by table and dialect. `None` marks the base
/// (dialect-independent) definition.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: HashMap<TableKey, Vec<LexicalRule>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table variant. Empty tables are ignored so that resolution
    /// never yields an empty table.
    pub fn define(&mut self, table: TableId, dialect: Option<Dialect>, rules: Vec<LexicalRule>) {
        if rules.is_empty() {
            return;
        }
        self.tables.insert((table, dialect), rules);
    }

    pub fn contains(&self, table: TableId, dialect: Option<Dialect>) -> bool {
        self.tables.contains_key(&(table, dialect))
    }

    /// Table variant registered for exactly this key, without fallback
    pub fn variant(&self, table: TableId, dialect: Option<Dialect>) -> Option<&[LexicalRule]> {
        self.tables.get(&(table, dialect)).map(Vec::as_slice)
    }

    /// Resolve `table` for `dialect`: the newest variant at or below the
    /// requested dialect, else the base table.
    pub fn resolve(
        &self,
        dialect: Dialect,
        table: TableId,
    ) -> Result<&[LexicalRule], MissingTableError> {
        dialect
            .fallback_chain()
            .find_map(|candidate| self.variant(table, Some(candidate)))
            .or_else(|| self.variant(table, None))
            .ok_or(MissingTableError { table, dialect })
    }
}
