//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    pub fn is_stdin(&self) -> bool {
        matches!(self, PathOrStdin::Stdin)
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits aligned text tables to stdout. `Json` emits a single JSON
/// document to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON output.
    Json,
}

/// Pattern and tagging flags shared by `compare` and `summary`.
#[derive(Args, Clone, Debug, Default)]
pub struct CompareArgs {
    /// Prune nodes matching this pattern (with descendants) from both trees.
    ///
    /// Defaults to `//*[not(.//text())]`: nodes with no text in their subtree.
    #[arg(long, value_name = "PATTERN", env = "ATTRDIFF_IGNORE_PATTERN")]
    pub ignore: Option<String>,

    /// Treat nodes matching this pattern as container-only (value ignored).
    ///
    /// Defaults to `//*[not(text()) or text()='N/A']`.
    #[arg(long, value_name = "PATTERN", env = "ATTRDIFF_CONTAINER_PATTERN")]
    pub container: Option<String>,

    /// Tag every output row with this stats type.
    #[arg(long, value_name = "TYPE")]
    pub stats_type: Option<String>,
}

/// All top-level subcommands exposed by the `attrdiff` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Compare a found attribute tree against the expected one.
    Compare {
        /// Path to the expected (ground truth) tree, or `-` for stdin.
        #[arg(value_name = "EXPECTED")]
        expected: PathOrStdin,
        /// Path to the found tree (cannot be `-` if EXPECTED is `-`).
        #[arg(value_name = "FOUND")]
        found: PathOrStdin,
        #[command(flatten)]
        args: CompareArgs,
        /// Also report every correct, incorrect and missed node.
        #[arg(long)]
        collect: bool,
    },

    /// Compare two trees and print per-path precision and recall.
    Summary {
        /// Path to the expected (ground truth) tree, or `-` for stdin.
        #[arg(value_name = "EXPECTED")]
        expected: PathOrStdin,
        /// Path to the found tree (cannot be `-` if EXPECTED is `-`).
        #[arg(value_name = "FOUND")]
        found: PathOrStdin,
        #[command(flatten)]
        args: CompareArgs,
        /// Fail when a container-only path also carries counts, instead of
        /// marking it with `*`.
        #[arg(long)]
        strict: bool,
    },

    /// List the nodes of a tree selected by a pattern.
    Select {
        /// Path to an attribute tree, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Selector pattern, e.g. `//Vendor/*[text()]`.
        #[arg(value_name = "PATTERN")]
        pattern: String,
    },
}

/// Root CLI struct for the `attrdiff` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "attrdiff",
    version,
    about = "Attribute-tree accuracy comparison",
    long_about = "Compares extracted attribute trees against ground truth.\n\
                  Reports per-path expected, correct, incorrect and missed counts,\n\
                  summarizes precision and recall, and evaluates selector patterns."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging on stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `ATTRDIFF_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "ATTRDIFF_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests;
