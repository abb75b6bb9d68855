//! Tokens emitted by the scanner
//!
//! A token is immutable once produced. Tokens are consumed by whatever pass
//! follows the scan (component extraction in the build tool) and then
//! discarded; they are never persisted.

pub mod token;

pub use token::{Token, TokenKind};
