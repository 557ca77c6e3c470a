use std::collections::BTreeMap;

use crate::tree::{AttributeArena, NodeId};

/// Joins `parent` and the segment of `id` into a qualified path.
pub(super) fn qualify(parent: &str, arena: &AttributeArena, id: NodeId) -> String {
    join(parent, &arena.segment(id))
}

/// Appends `segment` to `parent`, which may be empty at the root level.
pub(super) fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_owned()
    } else {
        format!("{parent}/{segment}")
    }
}

/// Path-keyed counter with optional per-node collection.
///
/// Counts are kept in a `BTreeMap` so aggregate rows come out sorted by
/// path. Collected nodes keep their classification order.
#[derive(Debug, Default)]
pub(super) struct PathTally {
    counts: BTreeMap<String, usize>,
    collected: Vec<(String, NodeId)>,
    collect: bool,
}

impl PathTally {
    pub(super) fn new(collect: bool) -> Self {
        Self {
            collect,
            ..Self::default()
        }
    }

    /// Counts one node at `path`.
    pub(super) fn record(&mut self, path: &str, id: NodeId) {
        *self.counts.entry(path.to_owned()).or_insert(0) += 1;
        if self.collect {
            self.collected.push((path.to_owned(), id));
        }
    }

    /// Counts every node in `ids` under `parent`, descending into children
    /// only when `recurse` is set.
    ///
    /// Container-only nodes are reported as their own row kind, so they are
    /// never counted here; their children still are.
    pub(super) fn record_all(
        &mut self,
        arena: &AttributeArena,
        ids: &[NodeId],
        parent: &str,
        recurse: bool,
    ) {
        for &id in ids {
            let path = qualify(parent, arena, id);
            if !arena.is_container_only(id) {
                self.record(&path, id);
            }
            if recurse {
                self.record_all(arena, arena.children(id), &path, true);
            }
        }
    }

    pub(super) fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub(super) fn collected(&self) -> &[(String, NodeId)] {
        &self.collected
    }
}
