//! C++ lexical tables
//!
//! Newer dialect tables are composed from older ones when they are authored
//! here; resolution itself never merges tables.

use super::dialect::Dialect;
use super::registry::TableRegistry;
use super::rules::{LexicalRule, MatchedPair, TableId};
use crate::config::compile_time::lexical::ESCAPE_CHAR;
use crate::tokens::TokenKind;

const PREPROCESSOR_KEYWORDS_98: &[&str] = &[
    "if", "elif", "else", "endif", "defined", "ifdef", "ifndef", "define", "undef", "include",
    "line", "error", "pragma",
];

const PREPROCESSOR_KEYWORDS_11_ADDITIONS: &[&str] = &["_Pragma"];

const CPP_KEYWORDS_98: &[&str] = &[
    "and",
    "and_eq",
    "asm",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "class",
    "compl",
    "const",
    "const_cast",
    "continue",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "not",
    "not_eq",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
    "xor",
    "xor_eq",
];

const CPP_KEYWORDS_11_ADDITIONS: &[&str] = &[
    "alignas",
    "alignof",
    "char16_t",
    "char32_t",
    "constexpr",
    "decltype",
    "final",
    "noexcept",
    "nullptr",
    "override",
    "static_assert",
    "thread_local",
];

const CPP_OPERATORS: &[(&str, &str)] = &[
    ("::", "OP_SCOPE"),
    ("++", "OP_INCREMENT"),
    ("--", "OP_DECREMENT"),
    ("->", "OP_PTR_MEMBER_ACCESS"),
    (".", "OP_MEMBER_ACCESS"),
    ("+", "OP_PLUS"),
    ("-", "OP_MINUS"),
    ("!", "OP_LOGICAL_NOT"),
    ("~", "OP_BITWISE_NOT"),
    ("*", "OP_STAR"),
    ("/", "OP_DIVIDE"),
    ("\\", "OP_LINE_CONT"),
    ("%", "OP_MODULUS"),
    ("&", "OP_AMPERSAND"),
    ("<<", "OP_SHIFT_LEFT"),
    (">>", "OP_SHIFT_RIGHT"),
    ("<=", "OP_LEQ"),
    ("==", "OP_EQ"),
    ("!=", "OP_NOT_EQ"),
    (">=", "OP_GEQ"),
    ("<", "OP_LT"),
    (">", "OP_GT"),
    ("^", "OP_BITWISE_XOR"),
    ("|", "OP_BITWISE_OR"),
    ("||", "OP_LOGICAL_OR"),
    ("&&", "OP_LOGICAL_AND"),
    ("?", "OP_TERTIARY_IF"),
    ("=", "OP_ASSIGN"),
    ("+=", "OP_ADD_ASSIGN"),
    ("-=", "OP_SUB_ASSIGN"),
    ("/=", "OP_DIV_ASSIGN"),
    ("*=", "OP_MULT_ASSIGN"),
    ("%=", "OP_MOD_ASSIGN"),
    ("<<=", "OP_SHL_ASSIGN"),
    (">>=", "OP_SHR_ASSIGN"),
    ("&=", "OP_AND_ASSIGN"),
    ("^=", "OP_XOR_ASSIGN"),
    ("|=", "OP_OR_ASSIGN"),
    (",", "OP_COMMA"),
];

const CPP_SYMBOLS: &[(&str, &str)] = &[
    ("(", "SYMBOL_LPAREN"),
    (")", "SYMBOL_RPAREN"),
    ("[", "SYMBOL_LBRACKET"),
    ("]", "SYMBOL_RBRACKET"),
    ("{", "SYMBOL_LBRACE"),
    ("}", "SYMBOL_RBRACE"),
    (";", "SYMBOL_SEMICOLON"),
    (":", "SYMBOL_COLON"),
    ("#", "SYMBOL_POUND"),
    ("...", "SYMBOL_ELLIPSIS"),
];

const ESCAPES: &[char] = &[ESCAPE_CHAR];

const CPP_MATCHED_PAIRS: &[MatchedPair] = &[
    MatchedPair::new("/*", "*/", TokenKind::Comment),
    MatchedPair::new("//", "\n", TokenKind::Comment)
        .with_escapes(ESCAPES)
        .closing_at_eof(),
    MatchedPair::new("'", "'", TokenKind::CharLiteral)
        .with_escapes(ESCAPES)
        .with_prefixes(TableId::CharPrefixes),
    MatchedPair::new("\"", "\"", TokenKind::StringLiteral)
        .with_escapes(ESCAPES)
        .with_prefixes(TableId::StringPrefixes)
        .with_suffixes(TableId::LiteralSuffixes),
];

const STRING_PREFIXES_98: &[&str] = &["L"];
const STRING_PREFIXES_11: &[&str] = &["L", "u8", "u", "U"];
const CHAR_PREFIXES_98: &[&str] = &["L"];
const CHAR_PREFIXES_11: &[&str] = &["L", "u", "U"];
const LITERAL_SUFFIXES_11: &[&str] = &["_"];

fn keywords(words: &[&'static str]) -> Vec<LexicalRule> {
    words.iter().map(|word| LexicalRule::Keyword(*word)).collect()
}

fn affixes(texts: &[&'static str]) -> Vec<LexicalRule> {
    texts.iter().map(|text| LexicalRule::Affix(*text)).collect()
}

/// Base set plus additions, authored as an explicit inheritance step
fn extend(base: Vec<LexicalRule>, additions: Vec<LexicalRule>) -> Vec<LexicalRule> {
    base.into_iter().chain(additions).collect()
}

impl TableRegistry {
    /// The C++ tables for every supported dialect
    pub fn cpp() -> Self {
        let mut registry = TableRegistry::new();

        let preprocessor_98 = keywords(PREPROCESSOR_KEYWORDS_98);
        let preprocessor_11 = extend(
            preprocessor_98.clone(),
            keywords(PREPROCESSOR_KEYWORDS_11_ADDITIONS),
        );
        registry.define(TableId::PreprocessorKeywords, Some(Dialect::Cpp98), preprocessor_98);
        registry.define(TableId::PreprocessorKeywords, Some(Dialect::Cpp11), preprocessor_11);

        let keywords_98 = keywords(CPP_KEYWORDS_98);
        let keywords_11 = extend(keywords_98.clone(), keywords(CPP_KEYWORDS_11_ADDITIONS));
        registry.define(TableId::LanguageKeywords, Some(Dialect::Cpp98), keywords_98);
        registry.define(TableId::LanguageKeywords, Some(Dialect::Cpp11), keywords_11);

        registry.define(
            TableId::Operators,
            None,
            CPP_OPERATORS
                .iter()
                .map(|&(text, label)| LexicalRule::Operator { text, label })
                .collect(),
        );
        registry.define(
            TableId::Symbols,
            None,
            CPP_SYMBOLS
                .iter()
                .map(|&(text, label)| LexicalRule::Symbol { text, label })
                .collect(),
        );
        registry.define(
            TableId::MatchedPairs,
            None,
            CPP_MATCHED_PAIRS
                .iter()
                .cloned()
                .map(LexicalRule::MatchedPair)
                .collect(),
        );

        registry.define(TableId::StringPrefixes, Some(Dialect::Cpp98), affixes(STRING_PREFIXES_98));
        registry.define(TableId::StringPrefixes, Some(Dialect::Cpp11), affixes(STRING_PREFIXES_11));
        registry.define(TableId::CharPrefixes, Some(Dialect::Cpp98), affixes(CHAR_PREFIXES_98));
        registry.define(TableId::CharPrefixes, Some(Dialect::Cpp11), affixes(CHAR_PREFIXES_11));
        registry.define(TableId::LiteralSuffixes, Some(Dialect::Cpp11), affixes(LITERAL_SUFFIXES_11));

        registry
    }
}
