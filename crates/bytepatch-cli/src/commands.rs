//! Command implementations.
//!
//! Each command writes its human-readable report to the supplied writer so
//! the binary can target stdout while tests capture the output.

use crate::config::Commands;
use anyhow::{Context, Result};
use bytepatch_core::{PatchBuilder, PatchDocument, TargetName};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Run a parsed command.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if the patch
/// engine rejects the input.
pub fn run<W: Write>(command: &Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Create {
            original,
            modified,
            output,
            target,
            comment,
        } => create(
            original,
            modified,
            output,
            target.as_deref(),
            comment.as_deref(),
            out,
        ),
        Commands::Info { patch, runs, limit } => show_info(patch, *runs, *limit, out),
        Commands::Apply {
            patch,
            target,
            dry_run,
        } => apply(patch, target, *dry_run, out),
        Commands::Check { patch, target } => check(patch, target, out),
    }
}

fn create<W: Write>(
    original: &Path,
    modified: &Path,
    output: &Path,
    target: Option<&str>,
    comment: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let original_bytes =
        fs::read(original).with_context(|| format!("Failed to read {}", original.display()))?;
    let modified_bytes =
        fs::read(modified).with_context(|| format!("Failed to read {}", modified.display()))?;

    let target = target.map_or_else(|| file_name(modified), str::to_string);
    let mut builder = PatchBuilder::new(original_bytes, modified_bytes).target_name(target);
    if let Some(comment) = comment {
        builder = builder.comment(comment);
    }

    let mut patch = builder.build().with_context(|| {
        format!(
            "Failed to diff {} against {}",
            original.display(),
            modified.display()
        )
    })?;
    patch
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote patch {}", output.display());
    writeln!(
        out,
        "Created {} for {} ({} runs, {} bytes changed)",
        output.display(),
        patch.target_name(),
        patch.run_count(),
        patch.edits().changed_bytes()
    )?;
    Ok(())
}

fn show_info<W: Write>(path: &Path, runs: bool, limit: usize, out: &mut W) -> Result<()> {
    let patch = load(path)?;
    let summary = patch.summary();

    writeln!(out, "Patch:              {}", path.display())?;
    writeln!(out, "Target:             {}", summary.target_name)?;
    writeln!(out, "Comment:            {}", patch.comment().unwrap_or("-"))?;
    writeln!(out, "Runs:               {}", summary.run_count)?;
    writeln!(out, "Changed bytes:      {}", summary.changed_bytes)?;
    writeln!(out, "Min target length:  {}", summary.min_target_length)?;
    writeln!(
        out,
        "Encoded size:       {} ({:.1}% payload)",
        summary.encoded_size,
        summary.payload_percentage()
    )?;

    if runs && summary.run_count > 0 {
        writeln!(out)?;
        for run in patch.runs().take(limit) {
            writeln!(out, "  {:#010x}  {:>3}  {}", run.offset, run.len(), run.hex())?;
        }
        if summary.run_count > limit {
            writeln!(out, "  ... {} more", summary.run_count - limit)?;
        }
    }
    Ok(())
}

fn apply<W: Write>(patch_path: &Path, target: &Path, dry_run: bool, out: &mut W) -> Result<()> {
    let patch = load(patch_path)?;
    warn_on_name_mismatch(&patch, target);

    let data = fs::read(target).with_context(|| format!("Failed to read {}", target.display()))?;
    if patch.is_applied(&data) {
        writeln!(out, "{} already patched, nothing to do", target.display())?;
        return Ok(());
    }

    let context = || {
        format!(
            "Cannot apply {} to {}",
            patch_path.display(),
            target.display()
        )
    };

    if dry_run {
        patch.apply_to_vec(&data).with_context(context)?;
        writeln!(
            out,
            "Dry run: {} runs would be written to {}",
            patch.run_count(),
            target.display()
        )?;
        return Ok(());
    }

    let written = patch.apply_to_path(target).with_context(context)?;
    info!("Patched {}", target.display());
    writeln!(out, "Patched {} ({} runs)", target.display(), written)?;
    Ok(())
}

fn check<W: Write>(patch_path: &Path, target: &Path, out: &mut W) -> Result<()> {
    let patch = load(patch_path)?;
    let data = fs::read(target).with_context(|| format!("Failed to read {}", target.display()))?;

    if patch.is_applied(&data) {
        writeln!(out, "{}: applied", target.display())?;
    } else {
        writeln!(out, "{}: not applied", target.display())?;
    }
    Ok(())
}

fn load(path: &Path) -> Result<PatchDocument> {
    PatchDocument::load(path).with_context(|| format!("Failed to load patch {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn warn_on_name_mismatch(patch: &PatchDocument, target: &Path) {
    let expected = patch.target_name();
    if expected.is_default() {
        return;
    }
    let actual = TargetName::normalize(&file_name(target));
    if &actual != expected {
        warn!(
            "Patch was made for {} but target is {}",
            expected,
            target.display()
        );
    }
}
