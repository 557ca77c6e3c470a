//! Implementation of `attrdiff summary <expected> <found>`.
//!
//! Compares the trees like `compare`, then folds the aggregate rows into
//! per-path precision, recall and F1.
//!
//! Container-only paths that also carry counts are marked with `*` unless
//! `--strict` is given, in which case they fail the run with exit code 1.
use attrdiff_core::{ConflictPolicy, SummaryOptions, summarize};

use crate::cli::{CompareArgs, OutputFormat, PathOrStdin};
use crate::cmd::compare::compare_files;
use crate::cmd::options::compare_options;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_summary_human, write_summary_json};

/// Runs the `summary` command.
///
/// # Errors
///
/// Everything `compare` reports, plus [`CliError::ContainerConflict`] in
/// strict mode.
pub fn run(
    expected: &PathOrStdin,
    found: &PathOrStdin,
    args: &CompareArgs,
    strict: bool,
    format: OutputFormat,
    max_file_size: u64,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let (options, patterns) = compare_options(args, false)?;
    let details = compare_files(expected, found, &options, &patterns, max_file_size, config)?;

    let summary_options = SummaryOptions {
        conflict_policy: if strict {
            ConflictPolicy::Strict
        } else {
            ConflictPolicy::Lenient
        },
    };
    let summary =
        summarize(&details, &summary_options).map_err(|e| CliError::from_core(e, "summary"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Human => write_summary_human(&mut out, &summary, config),
        OutputFormat::Json => write_summary_json(&mut out, &summary),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
