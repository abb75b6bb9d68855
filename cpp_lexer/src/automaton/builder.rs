//! Compiles resolved lexical tables into a transition graph

use super::node::{Behavior, Fallback, Node, NodeId, OpenConstruct};
use super::Automaton;
use crate::language::{
    is_identifier_char, is_identifier_start, Dialect, ResolvedMatchedPair, ResolvedSpec,
};
use crate::logging::{codes, Code};
use crate::tokens::TokenKind;

/// A table entry that could not be inserted. The first registration keeps
/// the contested node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildConflict {
    #[error("'{text}' is already registered as {existing}; {rejected} ignored")]
    DuplicateLiteral {
        text: &'static str,
        existing: TokenKind,
        rejected: TokenKind,
    },

    #[error("start sequence '{start}' of {kind} collides with an existing transition")]
    PairStart { start: &'static str, kind: TokenKind },

    #[error("prefix '{prefix}' already continues differently on '{start}'")]
    PrefixSplice {
        prefix: &'static str,
        start: &'static str,
    },
}

impl BuildConflict {
    pub fn error_code(&self) -> Code {
        codes::lexical::LITERAL_CONFLICT
    }
}

/// Incremental graph construction over a node arena
#[derive(Debug)]
pub struct AutomatonBuilder {
    nodes: Vec<Node>,
    start: NodeId,
    identifier: NodeId,
    number: NodeId,
    conflicts: Vec<BuildConflict>,
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            start: NodeId(0),
            identifier: NodeId(0),
            number: NodeId(0),
            conflicts: Vec::new(),
        };
        builder.start = builder.push(Node::new(Behavior::ExtraMatch(Fallback::Start)));
        builder.identifier = builder.push(Node::identifier());
        builder.number = builder.push(Node::number());
        builder
    }

    /// Compile every table of `spec` in insertion order: language keywords,
    /// preprocessor keywords, operators, symbols, then matched pairs.
    pub fn build(spec: &ResolvedSpec) -> Automaton {
        let mut builder = Self::new();
        for (text, kind) in spec.literals() {
            builder.insert_literal(text, kind);
        }
        for pair in &spec.matched_pairs {
            builder.insert_matched_pair(pair);
        }
        builder.finish(spec.dialect)
    }

    pub fn finish(self, dialect: Dialect) -> Automaton {
        Automaton {
            nodes: self.nodes,
            start: self.start,
            identifier: self.identifier,
            number: self.number,
            dialect,
            conflicts: self.conflicts,
        }
    }

    pub fn conflicts(&self) -> &[BuildConflict] {
        &self.conflicts
    }

    /// Walk or extend the graph along `text` and tag the terminal node.
    /// Returns false when the terminal already carries a non-identifier kind.
    pub fn insert_literal(&mut self, text: &'static str, kind: TokenKind) -> bool {
        let terminal = self.walk(self.start, text);
        match self.nodes[terminal.0].kind {
            Some(existing) if existing == kind => true,
            Some(existing) if existing != TokenKind::Identifier => {
                self.conflicts.push(BuildConflict::DuplicateLiteral {
                    text,
                    existing,
                    rejected: kind,
                });
                false
            }
            _ => {
                self.nodes[terminal.0].kind = Some(kind);
                true
            }
        }
    }

    pub fn insert_matched_pair(&mut self, resolved: &ResolvedMatchedPair) -> bool {
        let pair = &resolved.pair;
        let Some(last) = pair.start.chars().last() else {
            return false;
        };
        let lead = &pair.start[..pair.start.len() - last.len_utf8()];
        let opener = self.walk(self.start, lead);
        if self.nodes[opener.0].transitions.contains_key(&last) {
            self.conflicts.push(BuildConflict::PairStart {
                start: pair.start,
                kind: pair.kind,
            });
            return false;
        }

        let construct = OpenConstruct {
            kind: pair.kind,
            closes_at_eof: pair.closes_at_eof,
        };
        let body = NodeId(self.nodes.len());
        self.push(Node::new(Behavior::WaitUntil { center: body }).within(construct));
        self.link(opener, last, body);

        let mut inserted = true;
        if let Some(first) = pair.start.chars().next() {
            if let Some(entry) = self.nodes[self.start.0].transitions.get(&first).copied() {
                for prefix in &resolved.prefixes {
                    inserted &= self.splice_prefix(prefix, pair.start, first, entry);
                }
            }
        }

        if !pair.escapes.is_empty() {
            let escape = self.push(
                Node::new(Behavior::ExtraMatch(Fallback::Resume(body))).within(construct),
            );
            for &escape_char in pair.escapes {
                self.link(body, escape_char, escape);
            }
        }

        let mut current = body;
        let mut end = pair.end.chars().peekable();
        while let Some(c) = end.next() {
            let next = if end.peek().is_some() {
                self.push(Node::new(Behavior::WaitUntil { center: body }).within(construct))
            } else {
                self.push(Node::new(Behavior::Plain).with_kind(pair.kind))
            };
            self.link(current, c, next);
            current = next;
        }

        inserted
    }

    fn splice_prefix(
        &mut self,
        prefix: &'static str,
        start: &'static str,
        first: char,
        entry: NodeId,
    ) -> bool {
        let terminal = self.walk(self.start, prefix);
        match self.nodes[terminal.0].transitions.get(&first) {
            Some(&existing) if existing != entry => {
                self.conflicts.push(BuildConflict::PrefixSplice { prefix, start });
                false
            }
            _ => {
                self.link(terminal, first, entry);
                true
            }
        }
    }

    /// Follow explicit transitions from `from` along `text`, spawning nodes
    /// where none exist.
    fn walk(&mut self, from: NodeId, text: &str) -> NodeId {
        text.chars().fold(from, |current, c| {
            if let Some(&next) = self.nodes[current.0].transitions.get(&c) {
                return next;
            }
            let spawn_identifier = (current == self.start && is_identifier_start(c))
                || (self.nodes[current.0].has_identifier_fallback() && is_identifier_char(c));
            let next = if spawn_identifier {
                self.push(Node::identifier())
            } else {
                self.push(Node::new(Behavior::Plain))
            };
            self.link(current, c, next);
            next
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn link(&mut self, from: NodeId, c: char, to: NodeId) {
        self.nodes[from.0].transitions.insert(c, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::MatchedPair;
    use assert_matches::assert_matches;

    fn resolved(pair: MatchedPair, prefixes: &[&'static str]) -> ResolvedMatchedPair {
        ResolvedMatchedPair {
            pair,
            prefixes: prefixes.to_vec(),
            suffixes: Vec::new(),
        }
    }

    #[test]
    fn test_first_literal_registration_wins() {
        let mut builder = AutomatonBuilder::new();
        assert!(builder.insert_literal("if", TokenKind::Keyword("if")));
        assert!(!builder.insert_literal("if", TokenKind::Preprocessor("if")));

        assert_matches!(
            builder.conflicts(),
            [BuildConflict::DuplicateLiteral {
                text: "if",
                existing: TokenKind::Keyword("if"),
                ..
            }]
        );
        let automaton = builder.finish(Dialect::Cpp14);
        assert_eq!(automaton.classify("if"), Some(TokenKind::Keyword("if")));
    }

    #[test]
    fn test_reinserting_same_kind_is_not_a_conflict() {
        let mut builder = AutomatonBuilder::new();
        assert!(builder.insert_literal("->", TokenKind::Operator("OP_PTR_MEMBER_ACCESS")));
        assert!(builder.insert_literal("->", TokenKind::Operator("OP_PTR_MEMBER_ACCESS")));
        assert!(builder.conflicts().is_empty());

        let automaton = builder.finish(Dialect::Cpp14);
        assert_eq!(automaton.classify("->"), Some(TokenKind::Operator("OP_PTR_MEMBER_ACCESS")));
    }

    #[test]
    fn test_keyword_prefix_nodes_are_identifiers() {
        let mut builder = AutomatonBuilder::new();
        builder.insert_literal("char", TokenKind::Keyword("char"));
        builder.insert_literal("char16_t", TokenKind::Keyword("char16_t"));
        let automaton = builder.finish(Dialect::Cpp11);

        assert_eq!(automaton.classify("cha"), Some(TokenKind::Identifier));
        assert_eq!(automaton.classify("char1"), Some(TokenKind::Identifier));
        assert_eq!(
            automaton.classify("char16_t"),
            Some(TokenKind::Keyword("char16_t"))
        );
        assert_eq!(automaton.classify("char16_tx"), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_operator_nodes_are_plain() {
        let mut builder = AutomatonBuilder::new();
        builder.insert_literal(".", TokenKind::Operator("OP_MEMBER_ACCESS"));
        builder.insert_literal("...", TokenKind::Symbol("SYMBOL_ELLIPSIS"));
        let automaton = builder.finish(Dialect::Cpp14);

        assert_eq!(automaton.classify(".."), None);
        assert_eq!(
            automaton.classify("..."),
            Some(TokenKind::Symbol("SYMBOL_ELLIPSIS"))
        );
        assert_eq!(automaton.classify(".a"), None);
    }

    #[test]
    fn test_pair_start_collision_is_rejected() {
        let mut builder = AutomatonBuilder::new();
        let pair = MatchedPair::new("\"", "\"", TokenKind::StringLiteral);
        assert!(builder.insert_matched_pair(&resolved(pair.clone(), &[])));
        assert!(!builder.insert_matched_pair(&resolved(pair, &[])));
        assert_matches!(builder.conflicts(), [BuildConflict::PairStart { start: "\"", .. }]);
    }

    #[test]
    fn test_prefix_splices_into_pair_body() {
        let mut builder = AutomatonBuilder::new();
        let pair = MatchedPair::new("\"", "\"", TokenKind::StringLiteral);
        assert!(builder.insert_matched_pair(&resolved(pair, &["L", "u8"])));
        let automaton = builder.finish(Dialect::Cpp11);

        assert_eq!(
            automaton.classify("u8\"x\""),
            Some(TokenKind::StringLiteral)
        );
        assert_eq!(automaton.classify("L\"\""), Some(TokenKind::StringLiteral));
        assert_eq!(automaton.classify("u8"), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_block_comment_end_redispatches_through_body() {
        let mut builder = AutomatonBuilder::new();
        builder.insert_literal("/", TokenKind::Operator("OP_DIVIDE"));
        builder.insert_literal("*", TokenKind::Operator("OP_STAR"));
        builder.insert_matched_pair(&resolved(
            MatchedPair::new("/*", "*/", TokenKind::Comment),
            &[],
        ));
        let automaton = builder.finish(Dialect::Cpp14);

        assert_eq!(automaton.classify("/* a */"), Some(TokenKind::Comment));
        assert_eq!(automaton.classify("/* a **/"), Some(TokenKind::Comment));
        assert_eq!(automaton.classify("/* a * b */"), Some(TokenKind::Comment));
        assert_eq!(automaton.classify("/* a "), None);
        assert!(automaton.conflicts().is_empty());
    }
}
