//! Command-line front end for the bytepatch engine.
//!
//! This crate wires `bytepatch-core` to a small set of commands:
//! - `create`: diff two equal-length files into a patch container
//! - `info`: summarize a patch and optionally list its runs
//! - `apply`: apply a patch to a file in place
//! - `check`: report whether a file already carries the patched bytes
//!
//! # Architecture
//!
//! - `config`: Argument parsing and validation
//! - `commands`: Command implementations writing to any `Write` sink
//! - `error`: Configuration errors
//!
//! # Example
//!
//! ```no_run
//! use bytepatch_cli::{Cli, commands};
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::from_args();
//!     cli.validate()?;
//!
//!     commands::run(&cli.command, &mut std::io::stdout())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;

pub use config::{Cli, Commands};
pub use error::ConfigError;
