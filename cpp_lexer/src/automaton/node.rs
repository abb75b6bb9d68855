//! Arena nodes of the transition graph

use crate::tokens::TokenKind;
use std::collections::HashMap;

/// Index of a node in the automaton arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Character-class fallback consulted when an `ExtraMatch` node has no
/// explicit transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Identifier-start characters and decimal digits from the start node
    Start,
    Identifier,
    Number,
    /// Any character returns to the construct body (escape consumption)
    Resume(NodeId),
}

/// What a node does with a character it has no transition for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Dead end
    Plain,
    /// Re-dispatch through the body node's transitions, else stay in the body
    WaitUntil { center: NodeId },
    ExtraMatch(Fallback),
}

/// The matched pair whose interior a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenConstruct {
    pub kind: TokenKind,
    pub closes_at_eof: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: Option<TokenKind>,
    pub transitions: HashMap<char, NodeId>,
    pub construct: Option<OpenConstruct>,
    pub behavior: Behavior,
}

impl Node {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            kind: None,
            transitions: HashMap::new(),
            construct: None,
            behavior,
        }
    }

    pub fn with_kind(mut self, kind: TokenKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn within(mut self, construct: OpenConstruct) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Spawned by keyword prefixes and absorbing further identifier characters
    pub fn identifier() -> Self {
        Self::new(Behavior::ExtraMatch(Fallback::Identifier)).with_kind(TokenKind::Identifier)
    }

    pub fn number() -> Self {
        Self::new(Behavior::ExtraMatch(Fallback::Number)).with_kind(TokenKind::NumberLiteral)
    }

    pub fn has_identifier_fallback(&self) -> bool {
        self.behavior == Behavior::ExtraMatch(Fallback::Identifier)
    }
}
