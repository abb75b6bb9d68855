//! Shared primitive types used by the scanner and its diagnostics.

pub mod span;

pub use span::{Position, Span};
