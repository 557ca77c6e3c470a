/// Error type shared by every public entry point of the crate.
///
/// Each variant carries a stable diagnostic code (see [`CompareError::code`])
/// so callers can distinguish failure classes without matching on message
/// text. Cancellation is reported through its own variant and never mixed
/// with data errors.
use std::fmt;

use crate::pattern::PatternError;

/// All failure conditions of a comparison or summarization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// A caller-supplied precondition or an internal invariant did not hold.
    Precondition {
        /// The assertion that failed.
        assertion: String,
    },

    /// The caller cancelled the comparison; no partial result exists.
    Cancelled,

    /// A node snapshot could not be serialized while collecting match data.
    Snapshot {
        /// The underlying serializer message.
        detail: String,
    },

    /// An ignore or container pattern failed to parse.
    Pattern(PatternError),

    /// An attribute document could not be parsed.
    Parse {
        /// The underlying parser message.
        detail: String,
    },

    /// Strict summarization found a container-only path that also carries
    /// counted rows.
    ContainerConflict {
        /// The conflicting qualified path.
        path: String,
    },
}

impl CompareError {
    /// Stable diagnostic code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Precondition { .. } => "ATTR-E001",
            Self::Cancelled => "ATTR-E002",
            Self::Snapshot { .. } => "ATTR-E003",
            Self::Pattern(_) => "ATTR-E004",
            Self::Parse { .. } => "ATTR-E005",
            Self::ContainerConflict { .. } => "ATTR-E006",
        }
    }

    /// Returns `true` if the call was abandoned through cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            Self::Precondition { assertion } => {
                write!(f, "[{code}] assertion failed: {assertion}")
            }
            Self::Cancelled => write!(f, "[{code}] comparison cancelled"),
            Self::Snapshot { detail } => {
                write!(f, "[{code}] failed to serialize attribute: {detail}")
            }
            Self::Pattern(e) => write!(f, "[{code}] {e}"),
            Self::Parse { detail } => {
                write!(f, "[{code}] invalid attribute document: {detail}")
            }
            Self::ContainerConflict { path } => write!(
                f,
                "[{code}] path {path:?} is container-only but also has counted results"
            ),
        }
    }
}

impl std::error::Error for CompareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::Precondition { .. }
            | Self::Cancelled
            | Self::Snapshot { .. }
            | Self::Parse { .. }
            | Self::ContainerConflict { .. } => None,
        }
    }
}

impl From<PatternError> for CompareError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}
