//! Implementation of `attrdiff compare <expected> <found>`.
//!
//! Loads both trees, runs the comparer, and writes every accuracy row to
//! stdout.
//!
//! Flags:
//! - `--ignore <PATTERN>`: prune matching nodes before comparison.
//! - `--container <PATTERN>`: treat matching nodes as container-only.
//! - `--stats-type <TYPE>`: tag every row.
//! - `--collect`: add one row per correct, incorrect and missed node.
//!
//! Exit codes:
//! - 0 = comparison completed
//! - 1 = comparison failed
//! - 2 = an input or pattern could not be read
use std::time::Instant;

use attrdiff_core::{
    AccuracyDetail, CancellationToken, CompareOptions, ComparePatterns, compare_with_patterns,
};
use tracing::info;

use crate::cli::{CompareArgs, OutputFormat, PathOrStdin};
use crate::cmd::options::compare_options;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_details_human, write_details_json, write_timing_human};
use crate::io::load_tree;

/// Runs the `compare` command.
///
/// # Errors
///
/// - [`CliError::InvalidPattern`]: a pattern flag does not parse.
/// - [`CliError::ParseFailed`] and the other read errors: an input cannot be loaded.
/// - [`CliError::ComparisonFailed`]: the comparer aborted.
/// - [`CliError::IoError`]: stdout write failed.
pub fn run(
    expected: &PathOrStdin,
    found: &PathOrStdin,
    args: &CompareArgs,
    collect: bool,
    format: OutputFormat,
    max_file_size: u64,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let (options, patterns) = compare_options(args, collect)?;
    let details = compare_files(expected, found, &options, &patterns, max_file_size, config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Human => write_details_human(&mut out, &details, config),
        OutputFormat::Json => write_details_json(&mut out, &details),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}

/// Loads both trees and compares them, reporting timing in verbose mode.
///
/// Shared with the `summary` command.
///
/// # Errors
///
/// Read, parse and comparison errors, as for [`run`].
pub fn compare_files(
    expected: &PathOrStdin,
    found: &PathOrStdin,
    options: &CompareOptions,
    patterns: &ComparePatterns,
    max_file_size: u64,
    config: &FormatterConfig,
) -> Result<Vec<AccuracyDetail>, CliError> {
    let expected_nodes = load_tree(expected, max_file_size)?;
    let found_nodes = load_tree(found, max_file_size)?;

    let started = Instant::now();
    let details = compare_with_patterns(
        &expected_nodes,
        &found_nodes,
        patterns,
        options,
        &CancellationToken::new(),
    )
    .map_err(|e| CliError::from_core(e, "comparison"))?;
    let elapsed = started.elapsed();

    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    info!(rows = details.len(), elapsed_ms, "comparison finished");
    write_timing_human(&mut std::io::stderr(), "compared", elapsed, config).map_err(|e| {
        CliError::IoError {
            source: "stderr".to_owned(),
            detail: e.to_string(),
        }
    })?;
    Ok(details)
}
