/// Per-path accuracy summaries built from comparison rows.
///
/// [`summarize`] folds the aggregate rows of one or more comparisons into a
/// single row per (stats type, path) with expected, correct and incorrect
/// counts plus precision, recall and F1. [`aggregate_details`] sums the rows
/// of several comparisons (for example one per document in a batch) so they
/// can be summarized together.
///
/// # Container conflicts
///
/// A path can be reported as container-only and also carry counts, for
/// example a grouping node that is container-only in one document and
/// valued in another. [`ConflictPolicy`] decides what happens: `Strict`
/// fails with [`CompareError::ContainerConflict`]; `Lenient` keeps the row
/// and marks it so [`PathSummary::display_path`] ends in `*`.
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::compare::{AccuracyDetail, AccuracyDetailLabel};
use crate::error::CompareError;


/// How [`summarize`] treats a path that is both container-only and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail with [`CompareError::ContainerConflict`].
    Strict,
    /// Keep the row and flag it as conflicting.
    #[default]
    Lenient,
}

/// Knobs for [`summarize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    pub conflict_policy: ConflictPolicy,
}

/// Counts for one (stats type, path) group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_type: Option<String>,
    pub path: String,
    pub expected: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// A container-only row was seen for this path.
    pub container_only: bool,
    /// Container-only and counted at once (lenient mode only).
    pub conflict: bool,
}

impl PathSummary {
    /// Expected nodes that were not matched.
    pub fn missed(&self) -> usize {
        self.expected.saturating_sub(self.correct)
    }

    /// The path, suffixed with `*` when the row is a container conflict.
    pub fn display_path(&self) -> String {
        if self.conflict {
            format!("{}*", self.path)
        } else {
            self.path.clone()
        }
    }

    /// `correct / (correct + incorrect)`, or `None` when nothing was found.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.correct, self.correct + self.incorrect)
    }

    /// `correct / expected`, or `None` when nothing was expected.
    pub fn recall(&self) -> Option<f64> {
        ratio(self.correct, self.expected)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> Option<f64> {
        Some(harmonic_mean(self.precision()?, self.recall()?))
    }

    fn has_counts(&self) -> bool {
        self.expected + self.correct + self.incorrect > 0
    }
}

/// Totals across every row of an [`AccuracySummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub expected: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl SummaryTotals {
    pub fn missed(&self) -> usize {
        self.expected.saturating_sub(self.correct)
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.correct, self.correct + self.incorrect)
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.correct, self.expected)
    }

    pub fn f1(&self) -> Option<f64> {
        Some(harmonic_mean(self.precision()?, self.recall()?))
    }
}

/// Result of [`summarize`]: rows ordered by stats type, then path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccuracySummary {
    pub rows: Vec<PathSummary>,
    pub totals: SummaryTotals,
}

impl AccuracySummary {
    /// Number of rows flagged as container conflicts.
    pub fn conflict_count(&self) -> usize {
        self.rows.iter().filter(|r| r.conflict).count()
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / sum
    }
}

/// Folds aggregate comparison rows into per-path summaries.
///
/// Per-node rows (those carrying an attribute snapshot) are skipped, as are
/// labels the comparer never aggregates.
///
/// # Errors
///
/// - [`CompareError::Precondition`] if two aggregate rows share the same
///   stats type, label and path. Sum such rows with [`aggregate_details`]
///   first.
/// - [`CompareError::ContainerConflict`] under [`ConflictPolicy::Strict`]
///   when a container-only path also carries counts.
pub fn summarize(
    details: &[AccuracyDetail],
    options: &SummaryOptions,
) -> Result<AccuracySummary, CompareError> {
    let mut seen: HashSet<(Option<&str>, AccuracyDetailLabel, &str)> = HashSet::new();
    let mut groups: BTreeMap<(Option<String>, String), PathSummary> = BTreeMap::new();

    for detail in details.iter().filter(|d| d.is_aggregate()) {
        let key = (
            detail.stats_type.as_deref(),
            detail.label,
            detail.path.as_str(),
        );
        if !seen.insert(key) {
            return Err(CompareError::Precondition {
                assertion: format!(
                    "label/path pairs must be distinct: duplicate {} row for '{}'",
                    detail.label, detail.path
                ),
            });
        }

        let row = groups
            .entry((detail.stats_type.clone(), detail.path.clone()))
            .or_insert_with(|| PathSummary {
                stats_type: detail.stats_type.clone(),
                path: detail.path.clone(),
                ..PathSummary::default()
            });
        match detail.label {
            AccuracyDetailLabel::ContainerOnly => row.container_only = true,
            AccuracyDetailLabel::Expected => row.expected += detail.value,
            AccuracyDetailLabel::Correct => row.correct += detail.value,
            AccuracyDetailLabel::Incorrect => row.incorrect += detail.value,
            AccuracyDetailLabel::Missed
            | AccuracyDetailLabel::Found
            | AccuracyDetailLabel::FalsePositive
            | AccuracyDetailLabel::OverRedacted
            | AccuracyDetailLabel::UnderRedacted => {}
        }
    }

    let mut summary = AccuracySummary::default();
    for mut row in groups.into_values() {
        if row.container_only && row.has_counts() {
            match options.conflict_policy {
                ConflictPolicy::Strict => {
                    return Err(CompareError::ContainerConflict { path: row.path });
                }
                ConflictPolicy::Lenient => row.conflict = true,
            }
        }
        summary.totals.expected += row.expected;
        summary.totals.correct += row.correct;
        summary.totals.incorrect += row.incorrect;
        summary.rows.push(row);
    }
    Ok(summary)
}

/// Sums aggregate rows by (stats type, label, path).
///
/// Container-only rows stay at zero. Per-node rows are dropped. The output
/// is ordered by stats type, then label, then path, and never contains two
/// rows with the same key, so it is always accepted by [`summarize`].
pub fn aggregate_details<'a>(
    details: impl IntoIterator<Item = &'a AccuracyDetail>,
) -> Vec<AccuracyDetail> {
    let mut sums: BTreeMap<(Option<String>, AccuracyDetailLabel, String), usize> = BTreeMap::new();
    for detail in details.into_iter().filter(|d| d.is_aggregate()) {
        *sums
            .entry((
                detail.stats_type.clone(),
                detail.label,
                detail.path.clone(),
            ))
            .or_insert(0) += detail.value;
    }
    sums.into_iter()
        .map(|((stats_type, label, path), value)| AccuracyDetail {
            stats_type,
            ..AccuracyDetail::new(label, path, value)
        })
        .collect()
}
