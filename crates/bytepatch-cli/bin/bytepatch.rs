//! bytepatch binary entry point.
//!
//! This is a thin wrapper around the bytepatch-cli library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Validates configuration
//! 4. Runs the selected command
//!
//! For library usage, see the bytepatch-core crate documentation.

use anyhow::Result;
use bytepatch_cli::{Cli, commands};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // RUST_LOG takes precedence over -v/-q
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .init();

    cli.validate()?;

    let mut stdout = std::io::stdout().lock();
    commands::run(&cli.command, &mut stdout)?;

    Ok(())
}
