//! dustat - Disk Usage Inventory
//!
//! Entry point for the dustat CLI application.

use clap::Parser;
use dustat::{cli::Cli, error::ExitCode};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Run the application logic
    match dustat::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            // Determine appropriate exit code for errors
            let exit_code = ExitCode::from_error(&err);

            // Report the error
            eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);

            std::process::exit(exit_code.as_i32());
        }
    }
}
