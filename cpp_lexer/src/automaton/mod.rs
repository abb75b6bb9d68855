//! Deterministic transition graph compiled from lexical tables
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so the
//! self-referencing body and escape nodes of matched pairs need no shared
//! ownership. The graph is immutable once built and can be shared freely
//! between scanner threads.

pub mod builder;
pub mod node;

pub use builder::{AutomatonBuilder, BuildConflict};
pub use node::{Behavior, Fallback, Node, NodeId, OpenConstruct};

use crate::language::{
    is_identifier_char, is_identifier_start, is_number_char, is_number_start, Dialect,
    MissingTableError, ResolvedSpec, TableRegistry,
};
use crate::tokens::TokenKind;

#[derive(Debug, Clone)]
pub struct Automaton {
    nodes: Vec<Node>,
    start: NodeId,
    identifier: NodeId,
    number: NodeId,
    dialect: Dialect,
    conflicts: Vec<BuildConflict>,
}

impl Automaton {
    /// Resolve `registry` for `dialect` and compile it
    pub fn for_dialect(
        registry: &TableRegistry,
        dialect: Dialect,
    ) -> Result<Self, MissingTableError> {
        let spec = ResolvedSpec::for_dialect(registry, dialect)?;
        Ok(AutomatonBuilder::build(&spec))
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> Option<TokenKind> {
        self.nodes[id.0].kind
    }

    pub fn construct(&self, id: NodeId) -> Option<OpenConstruct> {
        self.nodes[id.0].construct
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Table entries rejected while building
    pub fn conflicts(&self) -> &[BuildConflict] {
        &self.conflicts
    }

    /// Transition out of `current` on `c`, consulting the node's behavior
    /// when no explicit edge exists. `None` is a dead end.
    pub fn step(&self, current: NodeId, c: char) -> Option<NodeId> {
        let node = &self.nodes[current.0];
        if let Some(&next) = node.transitions.get(&c) {
            return Some(next);
        }
        match node.behavior {
            Behavior::Plain => None,
            Behavior::WaitUntil { center } => Some(
                self.nodes[center.0]
                    .transitions
                    .get(&c)
                    .copied()
                    .unwrap_or(center),
            ),
            Behavior::ExtraMatch(Fallback::Start) => {
                if is_identifier_start(c) {
                    Some(self.identifier)
                } else if is_number_start(c) {
                    Some(self.number)
                } else {
                    None
                }
            }
            Behavior::ExtraMatch(Fallback::Identifier) => {
                is_identifier_char(c).then_some(self.identifier)
            }
            Behavior::ExtraMatch(Fallback::Number) => is_number_char(c).then_some(self.number),
            Behavior::ExtraMatch(Fallback::Resume(body)) => Some(body),
        }
    }

    /// Kind of the node reached by consuming all of `text` from the start
    /// node, or `None` if the walk dead-ends or stops on an untagged node.
    pub fn classify(&self, text: &str) -> Option<TokenKind> {
        text.chars()
            .try_fold(self.start, |current, c| self.step(current, c))
            .and_then(|node| self.kind(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpp(dialect: Dialect) -> Automaton {
        Automaton::for_dialect(&TableRegistry::cpp(), dialect).unwrap()
    }

    #[test]
    fn test_classify_keywords_and_identifiers() {
        let automaton = cpp(Dialect::Cpp14);
        assert_eq!(automaton.classify("class"), Some(TokenKind::Keyword("class")));
        assert_eq!(automaton.classify("classify"), Some(TokenKind::Identifier));
        assert_eq!(automaton.classify("_x1"), Some(TokenKind::Identifier));
        assert_eq!(automaton.classify("0x1F"), Some(TokenKind::NumberLiteral));
        assert_eq!(automaton.classify("1'000.5"), Some(TokenKind::NumberLiteral));
        assert_eq!(automaton.classify("@"), None);
    }

    #[test]
    fn test_dialect_override_changes_classification() {
        assert_eq!(
            cpp(Dialect::Cpp11).classify("constexpr"),
            Some(TokenKind::Keyword("constexpr"))
        );
        assert_eq!(
            cpp(Dialect::Cpp98).classify("constexpr"),
            Some(TokenKind::Identifier)
        );
        assert_eq!(
            cpp(Dialect::Cpp03).classify("char16_t"),
            Some(TokenKind::Identifier)
        );
    }

    #[test]
    fn test_operators_and_symbols() {
        let automaton = cpp(Dialect::Cpp14);
        assert_eq!(automaton.classify("<<="), Some(TokenKind::Operator("OP_SHL_ASSIGN")));
        assert_eq!(automaton.classify("::"), Some(TokenKind::Operator("OP_SCOPE")));
        assert_eq!(automaton.classify("{"), Some(TokenKind::Symbol("SYMBOL_LBRACE")));
        assert_eq!(automaton.classify("'a'"), Some(TokenKind::CharLiteral));
        assert_eq!(automaton.classify("// note\n"), Some(TokenKind::Comment));
    }

    #[test]
    fn test_preprocessor_keywords_yield_to_language_keywords() {
        let automaton = cpp(Dialect::Cpp14);
        assert_eq!(automaton.classify("if"), Some(TokenKind::Keyword("if")));
        assert_eq!(automaton.classify("ifdef"), Some(TokenKind::Preprocessor("ifdef")));

        let rejected: Vec<_> = automaton
            .conflicts()
            .iter()
            .filter_map(|conflict| match conflict {
                BuildConflict::DuplicateLiteral { text, .. } => Some(*text),
                _ => None,
            })
            .collect();
        assert_eq!(rejected, vec!["if", "else"]);
    }
}
