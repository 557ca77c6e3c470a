/// Output formatting: human-readable tables and JSON documents.
///
/// Three kinds of result reach stdout:
///
/// - **Details**: the raw [`AccuracyDetail`] rows from a comparison.
/// - **Summary**: per-path precision and recall from [`AccuracySummary`].
/// - **Selection**: the nodes a pattern selects from one tree.
///
/// Human mode colors labels when colors are enabled. Colors are disabled
/// when `--no-color` is set, the `NO_COLOR` environment variable is present
/// (per <https://no-color.org>), or stderr is not a TTY. JSON mode writes a
/// single pretty-printed document.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use attrdiff_core::{AccuracyDetail, AccuracyDetailLabel, AccuracySummary};
use serde::Serialize;
use serde_json::json;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

// ---------------------------------------------------------------------------
// ANSI escape sequences
// ---------------------------------------------------------------------------

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the formatters, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Drop headers and totals from human output.
    pub quiet: bool,
    /// Emit timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

/// One node picked out by `attrdiff select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub path: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

fn label_color(label: AccuracyDetailLabel) -> &'static str {
    match label {
        AccuracyDetailLabel::Correct => ANSI_GREEN,
        AccuracyDetailLabel::Incorrect => ANSI_RED,
        AccuracyDetailLabel::Missed => ANSI_YELLOW,
        AccuracyDetailLabel::ContainerOnly => ANSI_CYAN,
        AccuracyDetailLabel::Expected | AccuracyDetailLabel::Found => ANSI_BOLD,
        AccuracyDetailLabel::FalsePositive
        | AccuracyDetailLabel::OverRedacted
        | AccuracyDetailLabel::UnderRedacted => ANSI_RED,
    }
}

/// Writes comparison rows as an aligned table.
///
/// Aggregate rows show their count; per-node rows show the serialized node
/// in place of the count.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_details_human<W: Write>(
    writer: &mut W,
    details: &[AccuracyDetail],
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let label_width = details
        .iter()
        .map(|d| d.label.as_str().len())
        .max()
        .unwrap_or(0)
        .max("LABEL".len());
    let path_width = details
        .iter()
        .map(|d| d.path.len())
        .max()
        .unwrap_or(0)
        .max("PATH".len());

    if !config.quiet {
        writeln!(writer, "{:<label_width$}  {:<path_width$}  VALUE", "LABEL", "PATH")?;
    }

    for detail in details {
        let label = format!("{:<label_width$}", detail.label.as_str());
        let label = config.paint(&label, label_color(detail.label));
        let value = match &detail.attribute {
            Some(attribute) => attribute.clone(),
            None => detail.value.to_string(),
        };
        match &detail.stats_type {
            Some(stats_type) => writeln!(
                writer,
                "{label}  {:<path_width$}  {value}  [{stats_type}]",
                detail.path
            )?,
            None => writeln!(writer, "{label}  {:<path_width$}  {value}", detail.path)?,
        }
    }
    Ok(())
}

/// Writes comparison rows as a JSON array.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_details_json<W: Write>(
    writer: &mut W,
    details: &[AccuracyDetail],
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, details)?;
    writeln!(writer)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Formats an optional ratio with three decimals, or `-` when undefined.
pub fn fmt_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{r:.3}"),
        None => "-".to_owned(),
    }
}

/// Writes a per-path accuracy table followed by a totals line.
///
/// Conflicting container paths carry a trailing `*` and, unless quiet, a
/// footnote.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary_human<W: Write>(
    writer: &mut W,
    summary: &AccuracySummary,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let paths: Vec<String> = summary
        .rows
        .iter()
        .map(|row| match &row.stats_type {
            Some(stats_type) => format!("{stats_type}:{}", row.display_path()),
            None => row.display_path(),
        })
        .collect();
    let path_width = paths
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("TOTAL".len());

    if !config.quiet {
        let header = format!(
            "{:<path_width$}  {:>8}  {:>8}  {:>9}  {:>6}  {:>9}  {:>6}  {:>6}",
            "PATH", "EXPECTED", "CORRECT", "INCORRECT", "MISSED", "PRECISION", "RECALL", "F1"
        );
        writeln!(writer, "{}", config.paint(&header, ANSI_BOLD))?;
    }

    for (row, path) in summary.rows.iter().zip(&paths) {
        let path = format!("{path:<path_width$}");
        let path = if row.conflict {
            config.paint(&path, ANSI_YELLOW)
        } else {
            path
        };
        writeln!(
            writer,
            "{path}  {:>8}  {:>8}  {:>9}  {:>6}  {:>9}  {:>6}  {:>6}",
            row.expected,
            row.correct,
            row.incorrect,
            row.missed(),
            fmt_ratio(row.precision()),
            fmt_ratio(row.recall()),
            fmt_ratio(row.f1()),
        )?;
    }

    if config.quiet {
        return Ok(());
    }

    let totals = &summary.totals;
    writeln!(
        writer,
        "{:<path_width$}  {:>8}  {:>8}  {:>9}  {:>6}  {:>9}  {:>6}  {:>6}",
        "TOTAL",
        totals.expected,
        totals.correct,
        totals.incorrect,
        totals.missed(),
        fmt_ratio(totals.precision()),
        fmt_ratio(totals.recall()),
        fmt_ratio(totals.f1()),
    )?;

    let conflicts = summary.conflict_count();
    if conflicts > 0 {
        writeln!(
            writer,
            "* {conflicts} container-only {} with counts",
            pluralize(conflicts, "path", "paths")
        )?;
    }
    Ok(())
}

/// Writes the summary as a JSON object with `rows` and `totals`.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_summary_json<W: Write>(
    writer: &mut W,
    summary: &AccuracySummary,
) -> std::io::Result<()> {
    let rows: Vec<serde_json::Value> = summary
        .rows
        .iter()
        .map(|row| {
            json!({
                "stats_type": row.stats_type,
                "path": row.path,
                "expected": row.expected,
                "correct": row.correct,
                "incorrect": row.incorrect,
                "missed": row.missed(),
                "container_only": row.container_only,
                "conflict": row.conflict,
                "precision": row.precision(),
                "recall": row.recall(),
                "f1": row.f1(),
            })
        })
        .collect();
    let totals = &summary.totals;
    let document = json!({
        "rows": rows,
        "totals": {
            "expected": totals.expected,
            "correct": totals.correct,
            "incorrect": totals.incorrect,
            "missed": totals.missed(),
            "precision": totals.precision(),
            "recall": totals.recall(),
            "f1": totals.f1(),
        },
    });
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Writes one `path<TAB>value` line per selected node.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_selection_human<W: Write>(
    writer: &mut W,
    selection: &[Selection],
    config: &FormatterConfig,
) -> std::io::Result<()> {
    for node in selection {
        writeln!(writer, "{}\t{}", node.path, node.value)?;
    }
    if !config.quiet {
        writeln!(
            writer,
            "{} {} selected",
            selection.len(),
            pluralize(selection.len(), "node", "nodes")
        )?;
    }
    Ok(())
}

/// Writes the selection as a JSON array.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_selection_json<W: Write>(
    writer: &mut W,
    selection: &[Selection],
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, selection)?;
    writeln!(writer)
}

/// Writes timing information in verbose mode; a no-op otherwise.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing_human<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
