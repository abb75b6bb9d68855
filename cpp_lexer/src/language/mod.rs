//! Declarative lexical vocabulary
//!
//! Tables are registered per `(TableId, dialect)` and resolved by walking
//! from the requested dialect down to the oldest one, then to the base
//! definition.

pub mod cpp;
pub mod dialect;
pub mod registry;
pub mod rules;
pub mod spec;

pub use dialect::Dialect;
pub use registry::{MissingTableError, TableRegistry};
pub use rules::{LexicalRule, MatchedPair, TableId};
pub use spec::{LanguageSpec, ResolvedMatchedPair, ResolvedSpec};

use crate::config::compile_time::lexical::NUMBER_CONTINUATION_CHARS;

pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

pub fn is_number_start(c: char) -> bool {
    c.is_ascii_digit()
}

/// Digits, radix and exponent letters, `.`, and digit separators
pub fn is_number_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || NUMBER_CONTINUATION_CHARS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_classes() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('x'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_char('1'));
        assert!(!is_identifier_char('-'));
        assert!(is_number_start('0'));
        assert!(is_number_char('\''));
        assert!(is_number_char('x'));
        assert!(!is_number_char('+'));
    }
}
