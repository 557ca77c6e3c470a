use std::cmp::Ordering;

use tracing::trace;

use crate::cancel::CancellationToken;
use crate::error::CompareError;
use crate::tree::{AttributeArena, NodeId, eq_ignore_case};

use super::counting::{PathTally, qualify};
use super::scoring::Scorer;

/// A matching (expected, found) sibling pair eligible for commitment.
///
/// The derived order ranks candidates so that the best one is the maximum:
/// higher score first, then a positionally aligned pair over a non-aligned
/// one, then the earlier expected index, then the earlier found index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Candidate {
    pub score: i64,
    pub expected_index: usize,
    pub found_index: usize,
}

impl Candidate {
    fn is_aligned(&self) -> bool {
        self.expected_index == self.found_index
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.is_aligned().cmp(&other.is_aligned()))
            .then_with(|| other.expected_index.cmp(&self.expected_index))
            .then_with(|| other.found_index.cmp(&self.found_index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classification produced by a full resolution pass.
#[derive(Debug)]
pub(super) struct Resolution {
    /// Keyed by expected path; collected ids refer to the found arena.
    pub correct: PathTally,
    /// Collected ids refer to the found arena.
    pub incorrect: PathTally,
    /// Collected ids refer to the expected arena. Counts are not reported.
    pub missed: PathTally,
}

/// Global sibling resolver.
///
/// At each level every matching pair is scored, then the best remaining
/// pair is committed repeatedly until no candidate is left. Children of a
/// committed pair are resolved the same way, under the expected node's
/// path. Container-only nodes take part in matching but are never counted.
pub(super) struct Resolver<'a> {
    expected: &'a AttributeArena,
    found: &'a AttributeArena,
    cancel: &'a CancellationToken,
    scorer: Scorer<'a>,
    out: Resolution,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(
        expected: &'a AttributeArena,
        found: &'a AttributeArena,
        cancel: &'a CancellationToken,
        collect: bool,
    ) -> Self {
        Self {
            expected,
            found,
            cancel,
            scorer: Scorer::new(expected, found, cancel),
            out: Resolution {
                correct: PathTally::new(collect),
                incorrect: PathTally::new(collect),
                missed: PathTally::new(collect),
            },
        }
    }

    /// Resolves both forests from their roots and returns the classification.
    pub(super) fn run(mut self) -> Result<Resolution, CompareError> {
        let expected = self.expected;
        let found = self.found;
        self.resolve_level(expected.roots(), found.roots(), "")?;
        Ok(self.out)
    }

    fn candidates(
        &mut self,
        expected_ids: &[NodeId],
        found_ids: &[NodeId],
    ) -> Result<Vec<Candidate>, CompareError> {
        let mut candidates = Vec::new();
        for (expected_index, &e) in expected_ids.iter().enumerate() {
            for (found_index, &f) in found_ids.iter().enumerate() {
                let s = self.scorer.score(e, f)?;
                if s.is_match {
                    candidates.push(Candidate {
                        score: s.value,
                        expected_index,
                        found_index,
                    });
                }
            }
        }
        Ok(candidates)
    }

    fn resolve_level(
        &mut self,
        expected_ids: &[NodeId],
        found_ids: &[NodeId],
        parent_path: &str,
    ) -> Result<(), CompareError> {
        let expected = self.expected;
        let found = self.found;

        let mut candidates = self.candidates(expected_ids, found_ids)?;
        candidates.sort_unstable();

        let mut expected_used = vec![false; expected_ids.len()];
        let mut found_used = vec![false; found_ids.len()];

        while let Some(best) = candidates.pop() {
            self.cancel.check()?;

            let e = expected_ids[best.expected_index];
            let f = found_ids[best.found_index];
            expected_used[best.expected_index] = true;
            found_used[best.found_index] = true;

            let path = qualify(parent_path, expected, e);
            trace!(
                path = %path,
                score = best.score,
                expected_index = best.expected_index,
                found_index = best.found_index,
                "committed pair"
            );
            if !expected.is_container_only(e) {
                self.out.correct.record(&path, f);
            }
            self.resolve_level(expected.children(e), found.children(f), &path)?;

            candidates.retain(|c| {
                c.expected_index != best.expected_index && c.found_index != best.found_index
            });
        }

        for (&e, used) in expected_ids.iter().zip(&expected_used) {
            if !used {
                self.out.missed.record_all(expected, &[e], parent_path, true);
            }
        }
        for (&f, used) in found_ids.iter().zip(&found_used) {
            if !used {
                self.record_incorrect(f, expected_ids, parent_path);
            }
        }
        Ok(())
    }

    /// Records the unmatched found subtree at `f` as incorrect.
    ///
    /// A segment takes the casing of the first expected peer whose segment
    /// is equal ignoring case, so one field never splits into several paths.
    fn record_incorrect(&mut self, f: NodeId, peers: &[NodeId], parent_path: &str) {
        let expected = self.expected;
        let found = self.found;

        let segment = found.segment(f);
        let counterpart = peers
            .iter()
            .copied()
            .find(|&e| eq_ignore_case(&expected.segment(e), &segment));
        let path = match counterpart {
            Some(e) => qualify(parent_path, expected, e),
            None => qualify(parent_path, found, f),
        };

        if !found.is_container_only(f) {
            self.out.incorrect.record(&path, f);
        }
        let next_peers = counterpart.map_or(&[][..], |e| expected.children(e));
        for &child in found.children(f) {
            self.record_incorrect(child, next_peers, &path);
        }
    }
}
