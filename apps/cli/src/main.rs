//! # Pantry POS Entry Point
//!
//! Parses the command line and hands over to [`pantry_cli::run`]. Errors are
//! printed as a warning on stderr and mapped to an exit status:
//!
//! | Status | Cause                                       |
//! |--------|---------------------------------------------|
//! | 0      | Success                                     |
//! | 1      | Invalid input or business rule              |
//! | 2      | Bad command line (clap)                     |
//! | 3      | Login failed, session expired, forbidden    |
//! | 4      | Configuration                               |
//! | 5      | Remote store unreachable or failing         |

use std::process::ExitCode;

use clap::Parser;

use pantry_cli::cli::Cli;
use pantry_cli::error::CliError;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    pantry_cli::init_tracing();

    match pantry_cli::run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("warning: {err}");
            Ok(exit_code(&err))
        }
    }
}

fn exit_code(err: &CliError) -> ExitCode {
    u8::try_from(err.code.exit_code())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
