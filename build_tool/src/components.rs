//! Component class names declared in a header

use cpp_lexer::tokens::{Token, TokenKind};
use std::collections::BTreeSet;

/// Collect identifiers containing `marker` that directly follow the `class`
/// keyword. Comments between the two are skipped.
pub fn extract_components(tokens: &[Token], marker: &str) -> BTreeSet<String> {
    let mut components = BTreeSet::new();
    let mut after_class = false;

    for token in tokens.iter().filter(|token| !token.kind.is_trivia()) {
        if token.kind.is_keyword("class") {
            after_class = true;
        } else if after_class {
            after_class = false;
            if token.kind == TokenKind::Identifier && token.text.contains(marker) {
                components.insert(token.text.clone());
            }
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpp_lexer::language::Dialect;
    use cpp_lexer::logging::LoggingService;
    use cpp_lexer::Tokenizer;
    use std::sync::Arc;

    fn components(text: &str) -> Vec<String> {
        let tokenizer = Tokenizer::new(Dialect::Cpp14, Arc::new(LoggingService::disabled()));
        let output = tokenizer.tokenize_str(text).unwrap();
        extract_components(&output.tokens, "Component")
            .into_iter()
            .collect()
    }

    #[test]
    fn test_collects_component_classes() {
        let header = "
            class RenderComponent : public Base {};
            class Helper {};
            struct PhysicsComponent {};
            class /* tagged */ AudioComponent;
        ";
        assert_eq!(components(header), vec!["AudioComponent", "RenderComponent"]);
    }

    #[test]
    fn test_only_the_token_after_class_counts() {
        assert!(components("class Foo { ComponentList items; };").is_empty());
        assert_eq!(components("enum class ComponentKind { A };"), vec!["ComponentKind"]);
        assert!(components("// class CommentComponent\n").is_empty());
        assert!(components("\"class StringComponent\"").is_empty());
    }

    #[test]
    fn test_duplicate_declarations_collapse() {
        assert_eq!(
            components("class TagComponent; class TagComponent {};"),
            vec!["TagComponent"]
        );
    }
}
