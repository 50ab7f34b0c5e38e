//! Half-edges, the unit node of a [RingTree](crate::model::RingTree).

use crate::model::vertex::VertexIndex;

/// Index of a half-edge in a tree (arena).
pub type HalfEdgeIndex = usize;

/// Sentinel for "no support value" in the sentinel view of supports,
/// see [HalfEdge::back_support_or_sentinel].
pub const NO_SUPPORT: f64 = -1.0;

// =#========================================================================#=
// HALF EDGE
// =#========================================================================#=
/// One side of an edge of the tree.
///
/// Each half-edge belongs to the ring of exactly one [Vertex](crate::model::Vertex):
/// inner vertices own a ring of three half-edges, tips a ring of one.
/// Two half-edges across an edge reference each other via `back`.
///
/// # Invariants
/// - `index` is the index in the arena
/// - `next` is the next half-edge in the same vertex ring; for a tip it is
///   the half-edge itself
/// - `back` is symmetric: `a.back == Some(b)` iff `b.back == Some(a)`
/// - `back_length`, `back_label` and `back_support` are edge properties and
///   thus equal on both half-edges of an edge
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HalfEdge {
    /// Index of this half-edge in the tree arena
    pub(crate) index: HalfEdgeIndex,
    /// Vertex whose ring this half-edge belongs to
    pub(crate) vertex: VertexIndex,
    /// Next half-edge in the ring
    pub(crate) next: HalfEdgeIndex,
    /// Half-edge on the other side of the edge, if linked
    pub(crate) back: Option<HalfEdgeIndex>,
    /// Length of the edge
    pub(crate) back_length: f64,
    /// Free-text label of the edge; empty if absent
    pub(crate) back_label: String,
    /// Support value of the edge
    pub(crate) back_support: Option<f64>,
}

impl HalfEdge {
    /// Creates a new, unlinked half-edge.
    pub(crate) fn new(index: HalfEdgeIndex, vertex: VertexIndex, next: HalfEdgeIndex) -> Self {
        Self {
            index,
            vertex,
            next,
            back: None,
            back_length: 0.0,
            back_label: String::new(),
            back_support: None,
        }
    }

    /// Returns the index of this half-edge.
    pub fn index(&self) -> HalfEdgeIndex {
        self.index
    }

    /// Returns the index of the vertex this half-edge belongs to.
    pub fn vertex(&self) -> VertexIndex {
        self.vertex
    }

    /// Returns the next half-edge in the vertex ring.
    pub fn next(&self) -> HalfEdgeIndex {
        self.next
    }

    /// Returns the half-edge across the edge, or `None` if unlinked.
    pub fn back(&self) -> Option<HalfEdgeIndex> {
        self.back
    }

    /// Returns `true` if this half-edge is linked to another one.
    pub fn is_linked(&self) -> bool {
        self.back.is_some()
    }

    /// Returns the length of the edge (`0.0` if unlinked or not given).
    pub fn back_length(&self) -> f64 {
        self.back_length
    }

    /// Returns the label of the edge, or `None` if empty.
    pub fn back_label(&self) -> Option<&str> {
        if self.back_label.is_empty() {
            None
        } else {
            Some(&self.back_label)
        }
    }

    /// Returns the support value of the edge.
    pub fn back_support(&self) -> Option<f64> {
        self.back_support
    }

    /// Returns the support value of the edge, or [NO_SUPPORT] if unset.
    pub fn back_support_or_sentinel(&self) -> f64 {
        self.back_support.unwrap_or(NO_SUPPORT)
    }
}
