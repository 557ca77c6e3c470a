//! Implementation of `attrdiff select <file> <pattern>`.
//!
//! Evaluates a selector pattern against one tree and lists the matching
//! nodes in document order. Useful for checking an `--ignore` or
//! `--container` pattern before running a comparison with it.
use attrdiff_core::AttributeArena;

use crate::cli::{OutputFormat, PathOrStdin};
use crate::cmd::options::validate_pattern;
use crate::error::CliError;
use crate::format::{FormatterConfig, Selection, write_selection_human, write_selection_json};
use crate::io::load_tree;

/// Runs the `select` command.
///
/// # Errors
///
/// - [`CliError::InvalidPattern`]: the pattern does not parse.
/// - Read and parse errors for the input tree.
/// - [`CliError::IoError`]: stdout write failed.
pub fn run(
    file: &PathOrStdin,
    pattern: &str,
    format: OutputFormat,
    max_file_size: u64,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let pattern = validate_pattern(pattern)?;
    let nodes = load_tree(file, max_file_size)?;
    let arena = AttributeArena::from_nodes(&nodes);

    let selection: Vec<Selection> = arena
        .find_all_matching(&pattern)
        .into_iter()
        .map(|id| Selection {
            path: arena.qualified_path(id),
            value: arena.value(id).to_owned(),
        })
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Human => write_selection_human(&mut out, &selection, config),
        OutputFormat::Json => write_selection_json(&mut out, &selection),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
