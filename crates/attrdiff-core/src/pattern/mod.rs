/// XPath-like selector patterns over attribute arenas.
///
/// A [`Pattern`] is a `|`-separated union of location paths. Each path is a
/// chain of steps joined by `/` (child axis) or `//` (descendant axis); each
/// step is a name test (`Name` or `*`) followed by any number of bracketed
/// predicates.
///
/// # Predicates
///
/// | Form                      | True when                                         |
/// |---------------------------|---------------------------------------------------|
/// | `text()`                  | the node's value is non-empty                      |
/// | `text()='X'`, `!='X'`     | the value is non-empty and equals / differs from X |
/// | `.//text()`               | the node or any descendant has a non-empty value   |
/// | `@Type`                   | the node's type is non-empty                       |
/// | `@Type='X'`, `!='X'`      | the type is non-empty and equals / differs from X  |
/// | `matches(text(), 're')`   | the value is non-empty and matches the regex       |
/// | `Child/Grand`, `.//Name`  | the relative path selects at least one node        |
///
/// Predicates combine with `and`, `or`, `not(...)` and parentheses.
///
/// Name tests and `@Type` comparisons ignore case, mirroring how the
/// comparer treats names and types. `text()` comparisons are exact. A
/// pattern without a leading slash is evaluated from the document root,
/// exactly like one that starts with `/`.
mod parser;


use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::tree::{AttributeArena, NodeId, eq_ignore_case};

/// Selects every node that has no text anywhere in its subtree.
pub const DEFAULT_IGNORE_PATTERN: &str = "//*[not(.//text())]";

/// Selects every node whose own value is empty or `N/A`.
pub const DEFAULT_CONTAINER_PATTERN: &str = "//*[not(text()) or text()='N/A']";

// ---------------------------------------------------------------------------
// PatternError
// ---------------------------------------------------------------------------

/// A pattern string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// Byte offset into the pattern where the problem was detected.
    pub offset: usize,
    /// Human-readable description.
    pub message: String,
}

impl PatternError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid pattern at offset {}: {}",
            self.offset, self.message
        )
    }
}

impl std::error::Error for PatternError {}

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone)]
struct Comparison {
    op: CompareOp,
    literal: String,
}

#[derive(Debug, Clone)]
enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Text(Option<Comparison>),
    SubtreeText,
    Type(Option<Comparison>),
    Matches(Regex),
    Exists(Vec<Step>),
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    name: NameTest,
    predicates: Vec<Expr>,
}

#[derive(Debug, Clone)]
struct LocationPath {
    steps: Vec<Step>,
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// A compiled selector pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    paths: Vec<LocationPath>,
}

impl Pattern {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] with the byte offset of the first token that
    /// does not fit the grammar, or of an invalid `matches` expression.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let paths = parser::parse(source)?;
        Ok(Self {
            source: source.to_owned(),
            paths,
        })
    }

    /// The pattern text as supplied.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluates the pattern against `arena`.
    ///
    /// Returns each selected node once, in document order.
    pub fn select(&self, arena: &AttributeArena) -> Vec<NodeId> {
        let mut hit = vec![false; arena.len()];
        for path in &self.paths {
            for id in evaluate(arena, None, &path.steps) {
                hit[id.index()] = true;
            }
        }
        arena.ids().filter(|id| hit[id.index()]).collect()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Applies `steps` starting at `origin` (`None` is the virtual document
/// root whose children are the arena roots).
fn evaluate(arena: &AttributeArena, origin: Option<NodeId>, steps: &[Step]) -> Vec<NodeId> {
    let mut current: Vec<Option<NodeId>> = vec![origin];
    for step in steps {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut next: Vec<NodeId> = Vec::new();
        for &from in &current {
            for id in axis_nodes(arena, step.axis, from) {
                if !seen.contains(&id) && step.accepts(arena, id) {
                    seen.insert(id);
                    next.push(id);
                }
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        next.sort_unstable();
        current = next.into_iter().map(Some).collect();
    }
    current.into_iter().flatten().collect()
}

fn axis_nodes(arena: &AttributeArena, axis: Axis, from: Option<NodeId>) -> Vec<NodeId> {
    match (axis, from) {
        (Axis::Child, None) => arena.roots().to_vec(),
        (Axis::Child, Some(id)) => arena.children(id).to_vec(),
        (Axis::Descendant, None) => arena.ids().collect(),
        (Axis::Descendant, Some(id)) => arena.descendants(id).collect(),
    }
}

impl Step {
    fn accepts(&self, arena: &AttributeArena, id: NodeId) -> bool {
        let name_ok = match &self.name {
            NameTest::Any => true,
            NameTest::Name(name) => eq_ignore_case(name, arena.name(id)),
        };
        name_ok && self.predicates.iter().all(|p| p.holds(arena, id))
    }
}

impl Comparison {
    fn holds(&self, actual: &str, ignore_case: bool) -> bool {
        let equal = if ignore_case {
            eq_ignore_case(actual, &self.literal)
        } else {
            actual == self.literal
        };
        match self.op {
            CompareOp::Eq => equal,
            CompareOp::Ne => !equal,
        }
    }
}

impl Expr {
    fn holds(&self, arena: &AttributeArena, id: NodeId) -> bool {
        match self {
            Expr::Or(lhs, rhs) => lhs.holds(arena, id) || rhs.holds(arena, id),
            Expr::And(lhs, rhs) => lhs.holds(arena, id) && rhs.holds(arena, id),
            Expr::Not(inner) => !inner.holds(arena, id),
            Expr::Text(None) => !arena.value(id).is_empty(),
            Expr::Text(Some(cmp)) => {
                let value = arena.value(id);
                !value.is_empty() && cmp.holds(value, false)
            }
            Expr::SubtreeText => arena.has_text_in_subtree(id),
            Expr::Type(None) => !arena.attr_type(id).is_empty(),
            Expr::Type(Some(cmp)) => {
                let attr_type = arena.attr_type(id);
                !attr_type.is_empty() && cmp.holds(attr_type, true)
            }
            Expr::Matches(re) => {
                let value = arena.value(id);
                !value.is_empty() && re.is_match(value)
            }
            Expr::Exists(steps) => !evaluate(arena, Some(id), steps).is_empty(),
        }
    }
}
