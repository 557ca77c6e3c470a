/// Accuracy comparison of attribute trees.
///
/// A found attribute forest is matched against an expected one and every
/// node is classified as correct, incorrect or missed. Results are reported
/// as flat [`AccuracyDetail`] rows keyed by qualified path.
///
/// # Scope
///
/// - Pattern-driven pre-filtering: ignored subtrees are pruned, and
///   container-only nodes match on name and type alone.
/// - Pair scoring with greedy child assignment and a penalty for found
///   children that match nothing.
/// - Global sibling resolution with a deterministic tie-break that prefers
///   positionally aligned pairs.
/// - Per-path aggregate counts, plus optional per-node rows carrying a JSON
///   snapshot of each classified node.
mod counting;
mod engine;
mod resolve;
mod scoring;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{compare_attributes, compare_with_patterns};
pub use types::{AccuracyDetail, AccuracyDetailLabel, CompareOptions, ComparePatterns};
