use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pattern::{DEFAULT_CONTAINER_PATTERN, DEFAULT_IGNORE_PATTERN, Pattern, PatternError};

/// Role of an [`AccuracyDetail`] row.
///
/// The comparer only emits `ContainerOnly`, `Expected`, `Correct`,
/// `Incorrect` and `Missed`. The remaining variants are reserved for
/// other producers of the same report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyDetailLabel {
    /// The path held at least one node whose value is disregarded.
    ContainerOnly,
    /// Count of nodes at the path in the expected tree.
    Expected,
    /// Reserved.
    Found,
    /// Count (or instance) of expected nodes matched by a found node.
    Correct,
    /// Reserved.
    FalsePositive,
    /// Count (or instance) of found nodes that matched nothing.
    Incorrect,
    /// Instance of an expected node that matched nothing.
    Missed,
    /// Reserved.
    OverRedacted,
    /// Reserved.
    UnderRedacted,
}

impl AccuracyDetailLabel {
    /// Returns the `snake_case` name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContainerOnly => "container_only",
            Self::Expected => "expected",
            Self::Found => "found",
            Self::Correct => "correct",
            Self::FalsePositive => "false_positive",
            Self::Incorrect => "incorrect",
            Self::Missed => "missed",
            Self::OverRedacted => "over_redacted",
            Self::UnderRedacted => "under_redacted",
        }
    }
}

impl fmt::Display for AccuracyDetailLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of comparison output.
///
/// Aggregate rows carry a count in `value` and no `attribute`. Per-node
/// rows (only produced when match data is collected) carry the serialized
/// node in `attribute` and a `value` of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyDetail {
    pub label: AccuracyDetailLabel,
    /// Slash-separated qualified path, `Name@Type` per typed segment.
    pub path: String,
    pub value: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Caller-defined grouping key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_type: Option<String>,
}

impl AccuracyDetail {
    /// Creates an aggregate row.
    pub fn new(label: AccuracyDetailLabel, path: impl Into<String>, value: usize) -> Self {
        Self {
            label,
            path: path.into(),
            value,
            attribute: None,
            stats_type: None,
        }
    }

    /// Creates a per-node row carrying a serialized attribute.
    pub fn for_attribute(
        label: AccuracyDetailLabel,
        path: impl Into<String>,
        attribute: String,
    ) -> Self {
        Self {
            attribute: Some(attribute),
            ..Self::new(label, path, 0)
        }
    }

    /// Returns `true` for rows that carry a count rather than a node.
    pub fn is_aggregate(&self) -> bool {
        self.attribute.is_none()
    }
}

/// Knobs for [`compare_attributes`](super::compare_attributes).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompareOptions {
    /// Nodes selected by this pattern are pruned (with descendants) from both
    /// trees. `None` applies [`DEFAULT_IGNORE_PATTERN`].
    pub ignore_pattern: Option<String>,
    /// Nodes selected by this pattern match on name and type alone. `None`
    /// applies [`DEFAULT_CONTAINER_PATTERN`].
    pub container_pattern: Option<String>,
    /// Emit one extra row per correct, incorrect and missed node.
    pub collect_match_data: bool,
    /// Copied onto every output row.
    pub stats_type: Option<String>,
}

impl CompareOptions {
    /// The ignore pattern text, falling back to the default.
    pub fn ignore_source(&self) -> &str {
        self.ignore_pattern
            .as_deref()
            .unwrap_or(DEFAULT_IGNORE_PATTERN)
    }

    /// The container pattern text, falling back to the default.
    pub fn container_source(&self) -> &str {
        self.container_pattern
            .as_deref()
            .unwrap_or(DEFAULT_CONTAINER_PATTERN)
    }
}

/// The two compiled patterns a comparison applies.
///
/// Callers that compare many document pairs, or that validate patterns
/// themselves, compile once and pass this to
/// [`compare_with_patterns`](super::compare_with_patterns).
#[derive(Debug, Clone)]
pub struct ComparePatterns {
    pub ignore: Pattern,
    pub container: Pattern,
}

impl ComparePatterns {
    pub fn new(ignore: Pattern, container: Pattern) -> Self {
        Self { ignore, container }
    }

    /// Compiles the patterns named by `options`.
    ///
    /// # Errors
    ///
    /// [`PatternError`] for the first source that does not parse.
    pub fn from_options(options: &CompareOptions) -> Result<Self, PatternError> {
        Ok(Self {
            ignore: Pattern::parse(options.ignore_source())?,
            container: Pattern::parse(options.container_source())?,
        })
    }
}
