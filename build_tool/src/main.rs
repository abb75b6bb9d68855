//! # build_tool
//!
//! `build_tool SRC_DIR BIN_DIR`

use build_tool::cli::{self, Cli};
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("-- [FAILURE] build_tool: Invalid arguments");
            println!("{}", Cli::usage());
            return ExitCode::FAILURE;
        }
    };

    match cli::run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("-- [FAILURE] build_tool: {} [{}]", e, e.error_code());
            ExitCode::FAILURE
        }
    }
}
