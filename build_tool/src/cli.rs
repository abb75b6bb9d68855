//! Command-line entry point

use crate::config::{BuildToolConfig, RunSettings};
use crate::error::BuildToolError;
use crate::orchestrator::{verify_dir, Orchestrator, RunSummary};
use clap::{CommandFactory, Parser};
use cpp_lexer::log_error;
use cpp_lexer::logging::{LoggingService, MultiLogger};
use std::path::PathBuf;
use std::sync::Arc;

pub const CONSOLE_PREFIX: &str = "build-tool";

const ABOUT: &str = "build_tool runs before C++ pre-processing and compilation. \
It tokenizes the headers under SRC_DIR that changed since the last run, collects \
the component classes they declare, and records the results in a manifest in BIN_DIR.";

#[derive(Debug, Parser)]
#[command(name = "build_tool", version, about = ABOUT)]
pub struct Cli {
    /// Top-level directory of the project's source
    pub src_dir: PathBuf,
    /// Directory receiving the manifest and the log
    pub bin_dir: PathBuf,
}

impl Cli {
    /// Usage text printed after an argument error
    pub fn usage() -> String {
        format!("{}\n\n{}", Cli::command().render_usage(), ABOUT)
    }
}

/// Console sink plus a per-run file sink in the output directory
pub fn setup_logging(settings: &RunSettings) -> Result<LoggingService, BuildToolError> {
    let config = &settings.config;
    let verbosity = config.console_level.max(config.file_level);
    let log_path = settings.log_path();

    let sinks = MultiLogger::new(verbosity);
    let sinks = if config.structured_logs {
        sinks.with_structured_console(config.console_level)
    } else {
        sinks.with_console(config.console_level, CONSOLE_PREFIX)
    };
    let logger = sinks
        .with_file(&log_path, config.file_level, config.structured_logs)
        .map_err(|e| BuildToolError::LogSetup {
            path: log_path.clone(),
            message: e.to_string(),
        })?;

    Ok(LoggingService::new(Arc::new(logger), verbosity))
}

pub fn run(cli: Cli) -> Result<RunSummary, BuildToolError> {
    let bin_dir = verify_dir(&cli.bin_dir)?;
    let config = BuildToolConfig::discover(&bin_dir)?;
    let settings = RunSettings::new(cli.src_dir, bin_dir, config);
    let logger = Arc::new(setup_logging(&settings)?);

    let result = Orchestrator::new(settings, Arc::clone(&logger)).and_then(|tool| tool.run());
    if let Err(e) = &result {
        log_error!(logger, e.error_code(), "build-tool failed", "error" => e);
    }
    result
}
