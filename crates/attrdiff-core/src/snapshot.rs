/// Single-node string snapshots for per-node comparison rows.
///
/// Serialization goes through a reusable per-thread byte buffer, so a
/// comparison that collects thousands of nodes does not allocate a fresh
/// writer for each one. Nothing is shared between threads.
use std::cell::RefCell;

use crate::error::CompareError;
use crate::tree::AttributeNode;

thread_local! {
    static BUFFER: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Serializes `node` and its subtree to compact JSON.
///
/// # Errors
///
/// Returns [`CompareError::Snapshot`] if serialization fails or produces
/// invalid UTF-8.
pub fn snapshot(node: &AttributeNode) -> Result<String, CompareError> {
    BUFFER.with(|cell| {
        let mut buf = cell.borrow_mut();
        buf.clear();
        serde_json::to_writer(&mut *buf, node).map_err(|e| CompareError::Snapshot {
            detail: e.to_string(),
        })?;
        String::from_utf8(buf.clone()).map_err(|e| CompareError::Snapshot {
            detail: e.to_string(),
        })
    })
}
