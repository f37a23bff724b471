//! Command-line configuration.
//!
//! Configuration can be provided via:
//! - CLI arguments (`create --original ...`, `info --runs`, etc.)
//! - Environment variables (`BYTEPATCH_COMMENT`)
//! - Default values
//!
//! # Example
//!
//! ```no_run
//! use bytepatch_cli::Cli;
//!
//! let cli = Cli::from_args();
//! cli.validate().expect("Invalid configuration");
//! println!("log filter: {}", cli.log_filter());
//! ```

use crate::error::ConfigError;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Top-level arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bytepatch",
    about = "Create, inspect and apply fixed-length binary patches",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create a patch from an original and a modified file of equal length
    Create {
        /// File before modification
        #[arg(long)]
        original: PathBuf,

        /// File after modification
        #[arg(long)]
        modified: PathBuf,

        /// Patch file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Target file name stored in the patch (defaults to the modified
        /// file's name)
        #[arg(long)]
        target: Option<String>,

        /// Comment stored in the patch
        #[arg(long, env = "BYTEPATCH_COMMENT")]
        comment: Option<String>,
    },

    /// Show the contents of a patch
    Info {
        /// Patch file to inspect
        patch: PathBuf,

        /// List individual runs
        #[arg(long)]
        runs: bool,

        /// Maximum number of runs to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Apply a patch to a file in place
    Apply {
        /// Patch file
        patch: PathBuf,

        /// File to patch
        target: PathBuf,

        /// Validate without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report whether a file already contains the patched bytes
    Check {
        /// Patch file
        patch: PathBuf,

        /// File to check
        target: PathBuf,
    },
}

impl Cli {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Default `tracing` filter derived from `-v` and `-q`.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `create` would write its output over one of its inputs
    /// - `apply` targets the patch file itself
    /// - `info --limit` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Commands::Create {
                original,
                modified,
                output,
                ..
            } => {
                for input in [original, modified] {
                    ensure_distinct(output, input)?;
                }
            }
            Commands::Info { limit, .. } => {
                if *limit == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "limit",
                        reason: "must be greater than zero".to_string(),
                    });
                }
            }
            Commands::Apply { patch, target, .. } => ensure_distinct(target, patch)?,
            Commands::Check { .. } => {}
        }

        Ok(())
    }
}

fn ensure_distinct(output: &Path, input: &Path) -> Result<(), ConfigError> {
    if output == input {
        return Err(ConfigError::OutputOverwritesInput {
            output: output.to_path_buf(),
            input: input.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("Arguments should parse")
    }

    #[test]
    fn test_parse_create() {
        let cli = parse(&[
            "bytepatch",
            "create",
            "--original",
            "v1.bin",
            "--modified",
            "v2.bin",
            "-o",
            "fix.pat",
            "--comment",
            "hello",
        ]);

        match cli.command {
            Commands::Create {
                original,
                output,
                target,
                comment,
                ..
            } => {
                assert_eq!(original, PathBuf::from("v1.bin"));
                assert_eq!(output, PathBuf::from("fix.pat"));
                assert!(target.is_none());
                assert_eq!(comment.as_deref(), Some("hello"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(parse(&["bytepatch", "check", "a", "b"]).log_filter(), "warn");
        assert_eq!(
            parse(&["bytepatch", "-vv", "check", "a", "b"]).log_filter(),
            "debug"
        );
        assert_eq!(
            parse(&["bytepatch", "check", "a", "b", "-q"]).log_filter(),
            "error"
        );
        assert!(Cli::try_parse_from(["bytepatch", "-v", "-q", "check", "a", "b"]).is_err());
    }

    #[test]
    fn test_validate_rejects_overwriting_inputs() {
        let cli = parse(&[
            "bytepatch",
            "create",
            "--original",
            "v1.bin",
            "--modified",
            "v2.bin",
            "-o",
            "v1.bin",
        ]);
        assert!(matches!(
            cli.validate(),
            Err(ConfigError::OutputOverwritesInput { .. })
        ));

        let cli = parse(&["bytepatch", "apply", "fix.pat", "fix.pat"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_info_limit() {
        let cli = parse(&["bytepatch", "info", "fix.pat", "--runs", "--limit", "0"]);
        assert!(matches!(
            cli.validate(),
            Err(ConfigError::InvalidValue { field: "limit", .. })
        ));

        let cli = parse(&["bytepatch", "info", "fix.pat"]);
        assert!(cli.validate().is_ok());
    }
}
