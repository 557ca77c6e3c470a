#![allow(clippy::expect_used)]

mod node_tests;

use crate::cancel::CancellationToken;
use crate::tree::AttributeNode;

use super::{
    AccuracyDetail, AccuracyDetailLabel, CompareOptions, ComparePatterns, compare_attributes,
    compare_with_patterns,
};

pub(crate) fn leaf(name: &str, value: &str) -> AttributeNode {
    AttributeNode::new(name, value)
}

pub(crate) fn doc(children: Vec<AttributeNode>) -> AttributeNode {
    AttributeNode::new("Doc", "").with_children(children)
}

pub(crate) fn compare(
    expected: &[AttributeNode],
    found: &[AttributeNode],
    options: &CompareOptions,
) -> Vec<AccuracyDetail> {
    compare_attributes(expected, found, options, &CancellationToken::new()).expect("compare")
}

pub(crate) fn compare_default(
    expected: &[AttributeNode],
    found: &[AttributeNode],
) -> Vec<AccuracyDetail> {
    compare(expected, found, &CompareOptions::default())
}

pub(crate) fn collecting() -> CompareOptions {
    CompareOptions {
        collect_match_data: true,
        ..CompareOptions::default()
    }
}

/// Options whose container pattern selects nothing, so every node counts.
pub(crate) fn no_containers() -> CompareOptions {
    CompareOptions {
        container_pattern: Some("//NoSuchNode".to_owned()),
        ..CompareOptions::default()
    }
}

/// Aggregate rows with `label` as `(path, count)` pairs, in output order.
pub(crate) fn counts(details: &[AccuracyDetail], label: AccuracyDetailLabel) -> Vec<(&str, usize)> {
    details
        .iter()
        .filter(|d| d.label == label && d.is_aggregate())
        .map(|d| (d.path.as_str(), d.value))
        .collect()
}

/// Per-node rows with `label` as `(path, attribute)` pairs, in output order.
pub(crate) fn instances(
    details: &[AccuracyDetail],
    label: AccuracyDetailLabel,
) -> Vec<(&str, &str)> {
    details
        .iter()
        .filter(|d| d.label == label)
        .filter_map(|d| d.attribute.as_deref().map(|a| (d.path.as_str(), a)))
        .collect()
}
