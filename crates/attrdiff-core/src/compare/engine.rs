use std::collections::BTreeSet;

use tracing::debug;

use crate::cancel::CancellationToken;
use crate::error::CompareError;
use crate::pattern::Pattern;
use crate::snapshot::snapshot;
use crate::tree::{AttributeArena, AttributeNode};

use super::counting::PathTally;
use super::resolve::{Resolution, Resolver};
use super::types::{AccuracyDetail, AccuracyDetailLabel, CompareOptions, ComparePatterns};

/// Compares a found attribute forest against the expected one.
///
/// `expected` is the ground truth; `found` is the candidate being scored.
/// Neither input is modified.
///
/// # Algorithm
///
/// 1. Normalize both forests into arenas, prune every subtree selected by
///    the ignore pattern, and flag nodes selected by the container pattern.
/// 2. Count every expected node by qualified path, skipping container-only
///    nodes, which are reported only through their own rows.
/// 3. Resolve correspondences level by level: all matching sibling pairs
///    are scored, the best pair is committed, and its children are resolved
///    the same way. Unconsumed expected nodes are missed; unconsumed found
///    nodes are incorrect.
/// 4. Emit rows in this order: container-only paths, expected counts,
///    correct counts, incorrect counts, then (when collecting) one row per
///    correct, incorrect and missed node.
///
/// Aggregate rows within each label are sorted by path.
///
/// # Errors
///
/// - [`CompareError::Pattern`] if either pattern fails to parse.
/// - [`CompareError::Cancelled`] if `cancel` fires before the call returns.
/// - [`CompareError::Snapshot`] if a node cannot be serialized while
///   collecting match data.
pub fn compare_attributes(
    expected: &[AttributeNode],
    found: &[AttributeNode],
    options: &CompareOptions,
    cancel: &CancellationToken,
) -> Result<Vec<AccuracyDetail>, CompareError> {
    let patterns = ComparePatterns::from_options(options)?;
    compare_with_patterns(expected, found, &patterns, options, cancel)
}

/// Runs [`compare_attributes`] with already compiled patterns.
///
/// The pattern sources in `options` are not consulted.
///
/// # Errors
///
/// As for [`compare_attributes`], minus pattern errors.
pub fn compare_with_patterns(
    expected: &[AttributeNode],
    found: &[AttributeNode],
    patterns: &ComparePatterns,
    options: &CompareOptions,
    cancel: &CancellationToken,
) -> Result<Vec<AccuracyDetail>, CompareError> {
    let expected = prepare(expected, &patterns.ignore, &patterns.container);
    let found = prepare(found, &patterns.ignore, &patterns.container);
    cancel.check()?;

    let container_paths = container_paths(&expected, &found);

    let mut expected_tally = PathTally::new(false);
    expected_tally.record_all(&expected, expected.roots(), "", true);

    let resolution =
        Resolver::new(&expected, &found, cancel, options.collect_match_data).run()?;

    let mut details = Vec::new();
    details.extend(
        container_paths
            .into_iter()
            .map(|path| AccuracyDetail::new(AccuracyDetailLabel::ContainerOnly, path, 0)),
    );
    push_counts(&mut details, AccuracyDetailLabel::Expected, &expected_tally);
    push_counts(&mut details, AccuracyDetailLabel::Correct, &resolution.correct);
    push_counts(&mut details, AccuracyDetailLabel::Incorrect, &resolution.incorrect);

    if options.collect_match_data {
        push_nodes(&mut details, &resolution, &expected, &found)?;
    }

    if let Some(stats_type) = &options.stats_type {
        for detail in &mut details {
            detail.stats_type = Some(stats_type.clone());
        }
    }

    debug!(
        expected_nodes = expected.len(),
        found_nodes = found.len(),
        correct = total(&resolution.correct),
        incorrect = total(&resolution.incorrect),
        missed = total(&resolution.missed),
        rows = details.len(),
        "compared attribute trees"
    );

    Ok(details)
}

fn prepare(nodes: &[AttributeNode], ignore: &Pattern, container: &Pattern) -> AttributeArena {
    let mut arena = AttributeArena::from_nodes(nodes).remove_matching(ignore);
    arena.mark_container_only(container);
    arena
}

fn container_paths(expected: &AttributeArena, found: &AttributeArena) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for arena in [expected, found] {
        for id in arena.ids() {
            if arena.is_container_only(id) {
                paths.insert(arena.qualified_path(id));
            }
        }
    }
    paths
}

fn push_counts(details: &mut Vec<AccuracyDetail>, label: AccuracyDetailLabel, tally: &PathTally) {
    details.extend(
        tally
            .counts()
            .iter()
            .map(|(path, &count)| AccuracyDetail::new(label, path.clone(), count)),
    );
}

fn push_nodes(
    details: &mut Vec<AccuracyDetail>,
    resolution: &Resolution,
    expected: &AttributeArena,
    found: &AttributeArena,
) -> Result<(), CompareError> {
    let groups = [
        (AccuracyDetailLabel::Correct, &resolution.correct, found),
        (AccuracyDetailLabel::Incorrect, &resolution.incorrect, found),
        (AccuracyDetailLabel::Missed, &resolution.missed, expected),
    ];
    for (label, tally, arena) in groups {
        for (path, id) in tally.collected() {
            let attribute = snapshot(&arena.to_node(*id))?;
            details.push(AccuracyDetail::for_attribute(label, path.clone(), attribute));
        }
    }
    Ok(())
}

fn total(tally: &PathTally) -> usize {
    tally.counts().values().sum()
}
