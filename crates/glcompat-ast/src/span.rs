//! Source locations and node identity

use serde::{Deserialize, Serialize};

/// A span representing a range in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start
    pub start: usize,
    /// Byte offset of the end (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Merge two spans into one that covers both
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

/// Identity of an identifier occurrence within one translation unit.
///
/// Ids are stable across edits: renaming keeps the id, and nodes parsed from
/// injected fragments receive fresh ids from the unit's [`NodeIdGen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Monotonic allocator for [`NodeId`]s
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// A named occurrence in the tree: declarator names, function names,
/// parameters, call targets and variable references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub id: NodeId,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, id: NodeId, span: Span) -> Self {
        Self {
            name: name.into(),
            id,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let merged = Span::new(4, 9).merge(Span::new(1, 6));
        assert_eq!(merged, Span::new(1, 9));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = NodeIdGen::new();
        let a = ids.fresh();
        let b = ids.fresh();
        assert_ne!(a, b);
        assert_eq!(ids.allocated(), 2);
    }
}
