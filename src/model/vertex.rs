//! Vertex module for the half-edge ring representation.

use crate::model::half_edge::{HalfEdgeIndex, NO_SUPPORT};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Vertex descriptor shared by all half-edges of one vertex ring.
///
/// A vertex can be either:
/// - **Tip**: has a label and a single half-edge
/// - **Inner**: has three half-edges and an optional support value; this
///   covers bifurcating vertices (two children plus the connection towards
///   the caller) as well as the pseudo-root of an unrooted tree
///
/// # Invariants
/// - `index` is index in arena
/// - the half-edges referenced here reference this vertex back
/// - `ring[0]` is the primary half-edge of an inner vertex and
///   `ring[i].next == ring[(i + 1) % 3]`
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vertex {
    /// Tip (leaf) vertex
    Tip {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Tip name
        label: String,
        /// The single half-edge of this tip
        half_edge: HalfEdgeIndex,
    },
    /// Inner vertex of degree three
    Inner {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Support parsed from a plain-integer node label
        support: Option<f64>,
        /// Half-edges of the ring, starting with the primary one
        ring: [HalfEdgeIndex; 3],
    },
}

impl Vertex {
    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Tip { index, .. } | Vertex::Inner { index, .. } => *index,
        }
    }

    /// Returns `true` if this vertex is a tip.
    pub fn is_tip(&self) -> bool {
        matches!(self, Vertex::Tip { .. })
    }

    /// Returns `true` if this vertex is an inner vertex.
    pub fn is_inner(&self) -> bool {
        matches!(self, Vertex::Inner { .. })
    }

    /// Returns the label if this is a tip, else `None`.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Tip { label, .. } => Some(label),
            Vertex::Inner { .. } => None,
        }
    }

    /// Returns the vertex support if this is an inner vertex that has one.
    pub fn support(&self) -> Option<f64> {
        match self {
            Vertex::Tip { .. } => None,
            Vertex::Inner { support, .. } => *support,
        }
    }

    /// Returns the vertex support, or [NO_SUPPORT] if unset.
    pub fn support_or_sentinel(&self) -> f64 {
        self.support().unwrap_or(NO_SUPPORT)
    }

    /// Returns the half-edges of this vertex (one for a tip, three otherwise).
    pub fn half_edges(&self) -> &[HalfEdgeIndex] {
        match self {
            Vertex::Tip { half_edge, .. } => std::slice::from_ref(half_edge),
            Vertex::Inner { ring, .. } => ring,
        }
    }

    /// Returns the primary half-edge of this vertex.
    pub fn primary(&self) -> HalfEdgeIndex {
        self.half_edges()[0]
    }

    /// Returns the degree of this vertex as constructed (1 or 3).
    pub fn degree(&self) -> usize {
        self.half_edges().len()
    }
}
