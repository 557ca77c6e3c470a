/// Attribute trees and their normalized arena form.
///
/// [`AttributeNode`] is the serde-facing shape callers build or load from
/// JSON. Before comparison every tree is normalized into an
/// [`AttributeArena`]: nodes are laid out in preorder, addressed by
/// [`NodeId`], and carry a container-only flag. Because of the preorder
/// layout the descendants of a node always occupy the contiguous id range
/// directly after it.
///
/// The arena is also the surface the pattern engine works against:
/// [`AttributeArena::find_all_matching`] and
/// [`AttributeArena::remove_matching`] are the two selector operations the
/// comparer depends on. Removal never mutates the arena it is called on.
use serde::{Deserialize, Serialize};

use crate::error::CompareError;
use crate::pattern::Pattern;

// ---------------------------------------------------------------------------
// AttributeNode
// ---------------------------------------------------------------------------

/// A named, typed, valued element of a hierarchical extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeNode {
    /// Attribute name. Compared case-insensitively.
    pub name: String,
    /// Attribute type, possibly empty. Compared case-insensitively.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub attr_type: String,
    /// Attribute value text.
    #[serde(default)]
    pub value: String,
    /// Ordered sub-attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AttributeNode>,
}

impl AttributeNode {
    /// Creates an untyped leaf node.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attr_type: String::new(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Sets the attribute type.
    #[must_use]
    pub fn with_type(mut self, attr_type: impl Into<String>) -> Self {
        self.attr_type = attr_type.into();
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: AttributeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several child nodes in order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = AttributeNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(AttributeNode::subtree_size)
            .sum::<usize>()
    }
}

/// Parses a JSON document holding a root-level array of attribute nodes.
///
/// # Errors
///
/// - [`CompareError::Precondition`] if the document is the JSON literal
///   `null` (a missing attribute collection).
/// - [`CompareError::Parse`] if the text is not valid JSON or does not have
///   the attribute-node shape.
pub fn parse_attribute_tree(json: &str) -> Result<Vec<AttributeNode>, CompareError> {
    let parsed: Option<Vec<AttributeNode>> =
        serde_json::from_str(json).map_err(|e| CompareError::Parse {
            detail: e.to_string(),
        })?;
    parsed.ok_or_else(|| CompareError::Precondition {
        assertion: "attribute collection must not be null".to_owned(),
    })
}

/// Case-insensitive string equality used for names, types and values.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Opaque handle to a node inside one [`AttributeArena`].
///
/// Ids are preorder positions; comparing two ids compares document order.
/// An id is only meaningful for the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Preorder position of the node within its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// AttributeArena
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ArenaNode {
    name: String,
    attr_type: String,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subtree_size: usize,
    container_only: bool,
}

/// Index-addressed, preorder-normalized attribute forest.
#[derive(Debug, Clone, Default)]
pub struct AttributeArena {
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeId>,
}

impl AttributeArena {
    /// Normalizes a root-level node collection. Container-only flags start
    /// cleared.
    pub fn from_nodes(nodes: &[AttributeNode]) -> Self {
        let mut arena = Self::default();
        for node in nodes {
            let id = arena.push_node(node, None);
            arena.roots.push(id);
        }
        arena
    }

    fn push_node(&mut self, node: &AttributeNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            name: node.name.clone(),
            attr_type: node.attr_type.clone(),
            value: node.value.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            subtree_size: 1,
            container_only: false,
        });
        let mut size = 1;
        for child in &node.children {
            let child_id = self.push_node(child, Some(id));
            size += self.nodes[child_id.0].subtree_size;
            self.nodes[id.0].children.push(child_id);
        }
        self.nodes[id.0].subtree_size = size;
        id
    }

    /// Copies the subtree at `id` of `source` into `self`, skipping every
    /// subtree whose root is flagged in `excluded`.
    fn copy_subtree(
        &mut self,
        source: &AttributeArena,
        id: NodeId,
        parent: Option<NodeId>,
        excluded: &[bool],
    ) -> NodeId {
        let src = &source.nodes[id.0];
        let new_id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            name: src.name.clone(),
            attr_type: src.attr_type.clone(),
            value: src.value.clone(),
            parent,
            children: Vec::new(),
            subtree_size: 1,
            container_only: src.container_only,
        });
        let mut size = 1;
        for &child in &src.children {
            if excluded[child.0] {
                continue;
            }
            let child_id = self.copy_subtree(source, child, Some(new_id), excluded);
            size += self.nodes[child_id.0].subtree_size;
            self.nodes[new_id.0].children.push(child_id);
        }
        self.nodes[new_id.0].subtree_size = size;
        new_id
    }

    /// Root-level node ids in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Strict descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + use<> {
        let end = id.0 + self.nodes[id.0].subtree_size;
        (id.0 + 1..end).map(NodeId)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn attr_type(&self, id: NodeId) -> &str {
        &self.nodes[id.0].attr_type
    }

    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id.0].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes in the subtree rooted at `id`, inclusive.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        self.nodes[id.0].subtree_size
    }

    pub fn is_container_only(&self, id: NodeId) -> bool {
        self.nodes[id.0].container_only
    }

    /// Returns `true` if `id` or any of its descendants has a non-empty value.
    pub fn has_text_in_subtree(&self, id: NodeId) -> bool {
        let end = id.0 + self.nodes[id.0].subtree_size;
        self.nodes[id.0..end].iter().any(|n| !n.value.is_empty())
    }

    /// Path segment for `id`: the name, suffixed with `@Type` when the type
    /// is non-empty.
    pub fn segment(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        if node.attr_type.is_empty() {
            node.name.clone()
        } else {
            format!("{}@{}", node.name, node.attr_type)
        }
    }

    /// Fully qualified path of `id`, built by walking parent links.
    pub fn qualified_path(&self, id: NodeId) -> String {
        let mut segments = vec![self.segment(id)];
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            segments.push(self.segment(parent));
            current = self.nodes[parent.0].parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Ids of every node selected by `pattern`, deduplicated, in document order.
    pub fn find_all_matching(&self, pattern: &Pattern) -> Vec<NodeId> {
        pattern.select(self)
    }

    /// Returns a copy of this arena with every node selected by `pattern`
    /// removed together with its descendants.
    ///
    /// Ids are reassigned in the copy; container-only flags carry over.
    #[must_use]
    pub fn remove_matching(&self, pattern: &Pattern) -> AttributeArena {
        let mut excluded = vec![false; self.nodes.len()];
        for id in pattern.select(self) {
            excluded[id.0] = true;
        }
        let mut out = AttributeArena::default();
        for &root in &self.roots {
            if excluded[root.0] {
                continue;
            }
            let id = out.copy_subtree(self, root, None, &excluded);
            out.roots.push(id);
        }
        out
    }

    /// Flags every node selected by `pattern` as container-only and returns
    /// how many nodes were selected.
    pub fn mark_container_only(&mut self, pattern: &Pattern) -> usize {
        let selected = pattern.select(self);
        for &id in &selected {
            self.nodes[id.0].container_only = true;
        }
        selected.len()
    }

    /// Rebuilds the [`AttributeNode`] subtree rooted at `id`.
    pub fn to_node(&self, id: NodeId) -> AttributeNode {
        let node = &self.nodes[id.0];
        AttributeNode {
            name: node.name.clone(),
            attr_type: node.attr_type.clone(),
            value: node.value.clone(),
            children: node.children.iter().map(|&c| self.to_node(c)).collect(),
        }
    }

    /// Rebuilds the whole forest.
    pub fn to_nodes(&self) -> Vec<AttributeNode> {
        self.roots.iter().map(|&r| self.to_node(r)).collect()
    }
}
