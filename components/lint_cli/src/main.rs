//! Corten JavaScript Lint CLI
//!
//! Parses CLI arguments, sets up logging and delegates to the Runner.
//! Exits 0 when every file is clean, 1 when any diagnostic was reported
//! and 2 when the run itself failed.

use clap::Parser as ClapParser;
use lint_cli::{Cli, Runner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let result = Runner::from_cli(&cli).and_then(|runner| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        runner.run(&cli.files, cli.reporter, &mut out)
    });

    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
