//! Logging for the lexer and the build tool
//!
//! There is no process-wide logger. A `LoggingService` is built by the
//! binary from its configuration and passed explicitly, usually as
//! `Arc<LoggingService>`, to every component that reports events.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, FileLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};
