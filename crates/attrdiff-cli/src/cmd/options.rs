//! Translation of shared command-line flags into core comparison options.
use attrdiff_core::{CompareOptions, ComparePatterns, Pattern};

use crate::cli::CompareArgs;
use crate::error::CliError;

/// Builds [`CompareOptions`] from the shared flags, together with the
/// compiled patterns the comparison will apply.
///
/// Both patterns are parsed up front so that a malformed one is reported
/// against the argument the user typed, before any input is read.
///
/// # Errors
///
/// [`CliError::InvalidPattern`] when `--ignore` or `--container` does not
/// parse.
pub fn compare_options(
    args: &CompareArgs,
    collect: bool,
) -> Result<(CompareOptions, ComparePatterns), CliError> {
    let options = CompareOptions {
        ignore_pattern: args.ignore.clone(),
        container_pattern: args.container.clone(),
        collect_match_data: collect,
        stats_type: args.stats_type.clone(),
    };
    let patterns = ComparePatterns::new(
        validate_pattern(options.ignore_source())?,
        validate_pattern(options.container_source())?,
    );
    Ok((options, patterns))
}

/// Parses `source` as a selector pattern.
///
/// # Errors
///
/// [`CliError::InvalidPattern`] with the parser's offset and message.
pub fn validate_pattern(source: &str) -> Result<Pattern, CliError> {
    Pattern::parse(source).map_err(|e| CliError::InvalidPattern {
        pattern: source.to_owned(),
        detail: e.to_string(),
    })
}
