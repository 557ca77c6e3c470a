#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod cancel;
pub mod compare;
pub mod error;
pub mod pattern;
pub mod snapshot;
pub mod summary;
pub mod tree;

pub use cancel::CancellationToken;
pub use compare::{
    AccuracyDetail, AccuracyDetailLabel, CompareOptions, ComparePatterns, compare_attributes,
    compare_with_patterns,
};
pub use error::CompareError;
pub use pattern::{DEFAULT_CONTAINER_PATTERN, DEFAULT_IGNORE_PATTERN, Pattern, PatternError};
pub use snapshot::snapshot;
pub use summary::{
    AccuracySummary, ConflictPolicy, PathSummary, SummaryOptions, SummaryTotals,
    aggregate_details, summarize,
};
pub use tree::{AttributeArena, AttributeNode, NodeId, parse_attribute_tree};

/// Returns the current version of the attrdiff-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
