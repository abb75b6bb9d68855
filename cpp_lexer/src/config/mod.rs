//! Configuration module for the C++ lexer
//!
//! Only compile-time limits live here. Run-level settings such as the
//! dialect are chosen by the caller and passed to `Tokenizer::new`.

pub mod constants;

pub use constants::compile_time;
