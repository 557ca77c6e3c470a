/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `attrdiff` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read or parse an
///   input, or a pattern argument is malformed. Nothing was compared.
/// - Exit code **1**: logical failure. The inputs were fine but the run
///   ended in a well-defined failure (strict container conflict, comparison
///   aborted).
use std::fmt;
use std::path::PathBuf;

use attrdiff_core::CompareError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `attrdiff` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound { path: PathBuf },

    /// The process lacks permission to read a file.
    PermissionDenied { path: PathBuf },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        limit: u64,
        /// Known for disk files only.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 { source: String, byte_offset: usize },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// Any other I/O error, including failed writes to stdout.
    IoError { source: String, detail: String },

    /// Command-line arguments are individually valid but inconsistent.
    InvalidArgument { detail: String },

    /// A selector pattern argument could not be parsed.
    InvalidPattern { pattern: String, detail: String },

    /// An input is not a JSON array of attribute nodes.
    ParseFailed { source: String, detail: String },

    // --- Exit code 1: logical failures ---
    /// The comparison itself failed.
    ComparisonFailed { detail: String },

    /// `--strict` summarization found a container-only path with counts.
    ContainerConflict { path: String },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidPattern { .. }
            | Self::ParseFailed { .. } => 2,

            Self::ComparisonFailed { .. } | Self::ContainerConflict { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidArgument { detail } => format!("error: invalid argument: {detail}"),
            Self::InvalidPattern { pattern, detail } => {
                format!("error: invalid pattern '{pattern}': {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: cannot parse {source}: {detail}")
            }
            Self::ComparisonFailed { detail } => format!("error: comparison failed: {detail}"),
            Self::ContainerConflict { path } => {
                format!("error: container-only path '{path}' also carries counts")
            }
        }
    }

    /// Maps a core error raised while processing `source` to a CLI error.
    pub fn from_core(err: CompareError, source: &str) -> Self {
        match err {
            CompareError::Parse { detail } => Self::ParseFailed {
                source: source.to_owned(),
                detail,
            },
            CompareError::Precondition { assertion } => Self::ParseFailed {
                source: source.to_owned(),
                detail: assertion,
            },
            CompareError::Pattern(e) => Self::InvalidPattern {
                pattern: source.to_owned(),
                detail: e.to_string(),
            },
            CompareError::ContainerConflict { path } => Self::ContainerConflict { path },
            e @ (CompareError::Cancelled | CompareError::Snapshot { .. }) => {
                Self::ComparisonFailed {
                    detail: e.to_string(),
                }
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
