//! Per-vertex traversal filters.

use std::cmp::Ordering;

use graphwalk_common::types::Value;

use super::result::Path;
use crate::graph::Vertex;

/// What to do with a vertex the traversal has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitAction {
    /// Report it and keep expanding.
    #[default]
    Accept,
    /// Do not report it, but expand past it.
    Exclude,
    /// Report it, but do not expand past it.
    Prune,
    /// Neither report nor expand.
    ExcludeAndPrune,
}

impl VisitAction {
    /// Whether the vertex is reported.
    #[must_use]
    pub fn includes(self) -> bool {
        matches!(self, Self::Accept | Self::Prune)
    }

    /// Whether the traversal continues past the vertex.
    #[must_use]
    pub fn expands(self) -> bool {
        matches!(self, Self::Accept | Self::Exclude)
    }
}

/// Decides per visited vertex whether it is reported and expanded.
///
/// Any `Fn(&Vertex, &Path) -> VisitAction` closure is a filter.
pub trait TraversalFilter: Send + Sync {
    /// Called once for each frontier entry, with the path that reached it.
    fn visit(&self, vertex: &Vertex, path: &Path) -> VisitAction;
}

impl<F> TraversalFilter for F
where
    F: Fn(&Vertex, &Path) -> VisitAction + Send + Sync,
{
    fn visit(&self, vertex: &Vertex, path: &Path) -> VisitAction {
        self(vertex, path)
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    fn test(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// Excludes vertices whose property does not compare true against a value.
///
/// Vertices missing the property, or holding a value of another type, are
/// excluded. The start vertex is always accepted. Excluded vertices are
/// still expanded unless the filter is built with [`pruning`](Self::pruning).
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    key: String,
    op: CompareOp,
    value: Value,
    prune: bool,
}

impl PropertyFilter {
    /// Creates a filter on `key op value`.
    pub fn new(key: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
            prune: false,
        }
    }

    /// Also stops expansion at excluded vertices.
    #[must_use]
    pub fn pruning(mut self) -> Self {
        self.prune = true;
        self
    }

    fn matches(&self, vertex: &Vertex) -> bool {
        let Some(actual) = vertex.get_property(&self.key) else {
            return false;
        };
        let ordering = match (actual, &self.value) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => match (*a as f64).partial_cmp(b) {
                Some(o) => o,
                None => return false,
            },
            (Value::Float(a), Value::Int(b)) => match a.partial_cmp(&(*b as f64)) {
                Some(o) => o,
                None => return false,
            },
            (Value::Float(a), Value::Float(b)) => match a.partial_cmp(b) {
                Some(o) => o,
                None => return false,
            },
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (a, b) => {
                return match self.op {
                    CompareOp::Eq => a == b,
                    CompareOp::Ne => a != b,
                    _ => false,
                };
            }
        };
        self.op.test(ordering)
    }
}

impl TraversalFilter for PropertyFilter {
    fn visit(&self, vertex: &Vertex, path: &Path) -> VisitAction {
        if path.is_empty() || self.matches(vertex) {
            VisitAction::Accept
        } else if self.prune {
            VisitAction::ExcludeAndPrune
        } else {
            VisitAction::Exclude
        }
    }
}
