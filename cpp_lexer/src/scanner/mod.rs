//! Single forward pass of an automaton over source text

pub mod diagnostics;

pub use diagnostics::ScanDiagnostic;

use crate::automaton::{Automaton, NodeId};
use crate::tokens::Token;
use crate::utils::{Position, Span};
use serde::Serialize;

/// Tokens in source order plus everything the scanner skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    #[serde(skip)]
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ScanOutput {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Replays an automaton against input text. Longest match wins: a token is
/// emitted when the next character has nowhere to go.
pub struct Scanner<'a> {
    automaton: &'a Automaton,
}

impl<'a> Scanner<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }

    pub fn scan(&self, text: &str) -> ScanOutput {
        let start = self.automaton.start();
        let mut output = ScanOutput::default();
        let mut current = start;
        let mut token_start = Position::start();
        let mut pos = Position::start();

        for c in text.chars() {
            // Each character is dispatched at most twice: once from the
            // current node and once more from start after a dead end.
            loop {
                if let Some(next) = self.automaton.step(current, c) {
                    current = next;
                    break;
                }
                if current == start {
                    if !c.is_whitespace() {
                        output
                            .diagnostics
                            .push(ScanDiagnostic::UnrecognizedCharacter {
                                ch: c,
                                span: Span::of_char(pos, c),
                            });
                    }
                    token_start = pos.advance(c);
                    break;
                }
                self.complete(current, text, Span::new(token_start, pos), &mut output);
                current = start;
                token_start = pos;
            }
            pos = pos.advance(c);
        }

        if current != start {
            self.finish(current, text, Span::new(token_start, pos), &mut output);
        }
        output
    }

    /// Dead end on a non-start node
    fn complete(&self, node: NodeId, text: &str, span: Span, output: &mut ScanOutput) {
        match self.automaton.kind(node) {
            Some(kind) => output.tokens.push(Token::new(kind, span.slice(text), span)),
            None => output.diagnostics.push(ScanDiagnostic::IncompleteToken {
                text: span.slice(text).to_string(),
                span,
            }),
        }
    }

    /// End of input on a non-start node
    fn finish(&self, node: NodeId, text: &str, span: Span, output: &mut ScanOutput) {
        if self.automaton.kind(node).is_some() {
            return self.complete(node, text, span, output);
        }
        match self.automaton.construct(node) {
            Some(construct) if construct.closes_at_eof => output
                .tokens
                .push(Token::new(construct.kind, span.slice(text), span)),
            Some(construct) => output.diagnostics.push(ScanDiagnostic::UnterminatedLiteral {
                kind: construct.kind,
                span,
            }),
            None => self.complete(node, text, span, output),
        }
    }
}
