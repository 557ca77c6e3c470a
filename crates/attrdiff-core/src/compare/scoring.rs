use std::collections::HashMap;

use crate::cancel::CancellationToken;
use crate::error::CompareError;
use crate::tree::{AttributeArena, NodeId, eq_ignore_case};

/// Outcome of scoring one expected/found pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Score {
    pub value: i64,
    pub is_match: bool,
}

impl Score {
    const MISMATCH: Score = Score {
        value: 0,
        is_match: false,
    };
}

/// Returns `true` if `e` and `f` agree on name and type, and on value
/// unless both are container-only.
pub(super) fn nodes_equal(
    expected: &AttributeArena,
    e: NodeId,
    found: &AttributeArena,
    f: NodeId,
) -> bool {
    if !eq_ignore_case(expected.name(e), found.name(f))
        || !eq_ignore_case(expected.attr_type(e), found.attr_type(f))
    {
        return false;
    }
    (expected.is_container_only(e) && found.is_container_only(f))
        || eq_ignore_case(expected.value(e), found.value(f))
}

/// Recursive pair scorer.
///
/// A matching pair earns one point plus the scores of its children, where
/// children are paired greedily: each expected child, in order, claims the
/// highest-scoring matching found child still unclaimed (the earliest one on
/// ties). Every found child left unclaimed subtracts the size of its
/// subtree. This greedy pass only produces scores; which nodes actually
/// correspond is decided by the global resolution in `resolve`.
///
/// Scores are memoized per pair for the lifetime of the scorer.
pub(super) struct Scorer<'a> {
    expected: &'a AttributeArena,
    found: &'a AttributeArena,
    cancel: &'a CancellationToken,
    cache: HashMap<(NodeId, NodeId), Score>,
}

impl<'a> Scorer<'a> {
    pub(super) fn new(
        expected: &'a AttributeArena,
        found: &'a AttributeArena,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            expected,
            found,
            cancel,
            cache: HashMap::new(),
        }
    }

    /// Scores the pair (`e`, `f`).
    ///
    /// # Errors
    ///
    /// [`CompareError::Cancelled`] once the token is cancelled.
    pub(super) fn score(&mut self, e: NodeId, f: NodeId) -> Result<Score, CompareError> {
        self.cancel.check()?;
        if let Some(&cached) = self.cache.get(&(e, f)) {
            return Ok(cached);
        }

        let score = if nodes_equal(self.expected, e, self.found, f) {
            Score {
                value: 1 + self.score_children(e, f)?,
                is_match: true,
            }
        } else {
            Score::MISMATCH
        };

        self.cache.insert((e, f), score);
        Ok(score)
    }

    fn score_children(&mut self, e: NodeId, f: NodeId) -> Result<i64, CompareError> {
        let expected = self.expected;
        let found = self.found;
        let found_children = found.children(f);
        let mut claimed = vec![false; found_children.len()];
        let mut total: i64 = 0;

        for &ec in expected.children(e) {
            let mut best: Option<(usize, i64)> = None;
            for (j, &fc) in found_children.iter().enumerate() {
                if claimed[j] {
                    continue;
                }
                let s = self.score(ec, fc)?;
                if !s.is_match {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((_, best_value)) => s.value > best_value,
                };
                if better {
                    best = Some((j, s.value));
                }
            }
            if let Some((j, value)) = best {
                claimed[j] = true;
                total += value;
            }
        }

        for (j, &fc) in found_children.iter().enumerate() {
            if !claimed[j] {
                total -= subtree_penalty(found, fc);
            }
        }
        Ok(total)
    }
}

fn subtree_penalty(arena: &AttributeArena, id: NodeId) -> i64 {
    i64::try_from(arena.subtree_size(id)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::pattern::Pattern;
    use crate::tree::AttributeNode;

    fn score_roots(expected: &[AttributeNode], found: &[AttributeNode]) -> Score {
        let e = AttributeArena::from_nodes(expected);
        let f = AttributeArena::from_nodes(found);
        let cancel = CancellationToken::new();
        let mut scorer = Scorer::new(&e, &f, &cancel);
        scorer.score(e.roots()[0], f.roots()[0]).expect("score")
    }

    #[test]
    fn leaf_match_scores_one() {
        let s = score_roots(&[AttributeNode::new("A", "x")], &[AttributeNode::new("a", "X")]);
        assert_eq!(
            s,
            Score {
                value: 1,
                is_match: true
            }
        );
    }

    #[test]
    fn value_mismatch_short_circuits() {
        let s = score_roots(
            &[AttributeNode::new("A", "x").with_child(AttributeNode::new("B", "1"))],
            &[AttributeNode::new("A", "y").with_child(AttributeNode::new("B", "1"))],
        );
        assert_eq!(s, Score::MISMATCH);
    }

    #[test]
    fn type_must_agree() {
        let s = score_roots(
            &[AttributeNode::new("A", "x").with_type("T1")],
            &[AttributeNode::new("A", "x").with_type("t2")],
        );
        assert!(!s.is_match);
    }

    #[test]
    fn matched_children_add_their_scores() {
        let tree = AttributeNode::new("A", "x")
            .with_child(AttributeNode::new("B", "1").with_child(AttributeNode::new("C", "2")))
            .with_child(AttributeNode::new("D", "3"));
        let s = score_roots(std::slice::from_ref(&tree), std::slice::from_ref(&tree));
        assert_eq!(s.value, 4);
    }

    #[test]
    fn unclaimed_found_children_cost_their_subtree() {
        let s = score_roots(
            &[AttributeNode::new("A", "x")],
            &[AttributeNode::new("A", "x")
                .with_child(AttributeNode::new("B", "1").with_child(AttributeNode::new("C", "2")))],
        );
        assert_eq!(s.value, 1 - 2);
        assert!(s.is_match);
    }

    #[test]
    fn unmatched_expected_children_cost_nothing() {
        let s = score_roots(
            &[AttributeNode::new("A", "x").with_child(AttributeNode::new("B", "1"))],
            &[AttributeNode::new("A", "x")],
        );
        assert_eq!(s.value, 1);
    }

    #[test]
    fn greedy_claims_in_expected_order() {
        // E1 takes the first of two equally scored found children, so E2 is
        // left with the weaker one even though swapping would score higher
        // overall.
        let expected = AttributeNode::new("R", "r")
            .with_child(AttributeNode::new("E", "v"))
            .with_child(AttributeNode::new("E", "v").with_child(AttributeNode::new("K", "k")));
        let found = AttributeNode::new("R", "r")
            .with_child(AttributeNode::new("E", "v").with_child(AttributeNode::new("K", "k")))
            .with_child(AttributeNode::new("E", "v"));
        let s = score_roots(&[expected], &[found]);
        // E1 vs F1 = 1 - 1 = 0, E1 vs F2 = 1: E1 claims F2.
        // E2 vs F1 = 2: E2 claims F1. Total = 1 + 1 + 2.
        assert_eq!(s.value, 4);
    }

    #[test]
    fn greedy_ties_go_to_first_found_child() {
        let expected = AttributeNode::new("R", "r")
            .with_child(AttributeNode::new("E", "v"))
            .with_child(AttributeNode::new("E", "v").with_child(AttributeNode::new("K", "k")));
        let found = AttributeNode::new("R", "r")
            .with_child(AttributeNode::new("E", "v").with_child(AttributeNode::new("K", "k")))
            .with_child(AttributeNode::new("E", "v").with_child(AttributeNode::new("K", "k")));
        let s = score_roots(&[expected], &[found]);
        // E1 scores 0 against both and claims F1; E2 claims F2 for 2.
        assert_eq!(s.value, 1 + 0 + 2);
    }

    #[test]
    fn container_only_pairs_ignore_value() {
        let mut e = AttributeArena::from_nodes(&[AttributeNode::new("Group", "one")]);
        let mut f = AttributeArena::from_nodes(&[AttributeNode::new("Group", "two")]);
        let all = Pattern::parse("//*").expect("pattern");
        assert!(!nodes_equal(&e, e.roots()[0], &f, f.roots()[0]));

        e.mark_container_only(&all);
        assert!(
            !nodes_equal(&e, e.roots()[0], &f, f.roots()[0]),
            "both sides must be container-only"
        );

        f.mark_container_only(&all);
        assert!(nodes_equal(&e, e.roots()[0], &f, f.roots()[0]));
    }

    #[test]
    fn cancelled_token_stops_scoring() {
        let e = AttributeArena::from_nodes(&[AttributeNode::new("A", "x")]);
        let f = AttributeArena::from_nodes(&[AttributeNode::new("A", "x")]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut scorer = Scorer::new(&e, &f, &cancel);
        assert_eq!(
            scorer.score(e.roots()[0], f.roots()[0]),
            Err(CompareError::Cancelled)
        );
    }
}
