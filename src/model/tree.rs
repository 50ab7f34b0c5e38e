//! Provides the half-edge ring tree representation.
//!
//! * [RingTree] - arena of [Vertex] descriptors and [HalfEdge]s
//! * [PreOrderIter] - traversal from an arbitrary half-edge

use crate::model::half_edge::{HalfEdge, HalfEdgeIndex};
use crate::model::vertex::{Vertex, VertexIndex};
use crate::newick::NewickWriter;
use crate::parser::Result;

/// Float comparison tolerance
const EPSILON: f64 = 1e-7;

// =$========================================================================$=
// RING TREE
// =$========================================================================$=
/// A phylogenetic tree, rooted or unrooted, represented by rings of
/// half-edges stored in an arena.
///
/// Every inner vertex owns a ring of three half-edges and every tip a single
/// half-edge. An edge of the tree is a pair of half-edges linked via `back`,
/// carrying the edge's length, label and support on both sides.
/// No half-edge is privileged as "the root": any half-edge is a valid entry
/// point for traversal and printing.
///
/// # Structure
/// - Vertices and half-edges are stored in contiguous vectors and referenced
///   by [VertexIndex] and [HalfEdgeIndex].
/// - A tree parsed with a trifurcating top-level vertex (pseudo-root) has all
///   inner half-edges linked; a tree parsed with a bifurcating top-level
///   vertex has exactly one unlinked inner half-edge, its primary one.
/// - The half-edge returned by the parser is remembered as
///   [entry](Self::entry).
///
/// # Construction
/// Add vertices with [`add_tip`](Self::add_tip) and
/// [`add_inner`](Self::add_inner), then join them pairwise with
/// [`link`](Self::link). Test validity with [`is_valid`](Self::is_valid).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingTree {
    /// Vertex descriptors (arena pattern)
    vertices: Vec<Vertex>,

    /// Half-edges (arena pattern)
    half_edges: Vec<HalfEdge>,

    /// Half-edge returned by the parser, if any
    entry: Option<HalfEdgeIndex>,
}

// ============================================================================
// New, Construction (pub)
// ============================================================================
impl RingTree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty tree with capacity for an unrooted tree with
    /// `num_tips` tips, i.e. `num_tips - 2` inner vertices.
    pub fn with_num_tips(num_tips: usize) -> Self {
        let num_inner = num_tips.saturating_sub(2);
        RingTree {
            vertices: Vec::with_capacity(num_tips + num_inner),
            half_edges: Vec::with_capacity(num_tips + 3 * num_inner),
            entry: None,
        }
    }

    /// Adds a tip with the given label and returns its single half-edge.
    pub fn add_tip(&mut self, label: String) -> HalfEdgeIndex {
        let vertex = self.vertices.len();
        let half_edge = self.half_edges.len();

        self.half_edges
            .push(HalfEdge::new(half_edge, vertex, half_edge));
        self.vertices.push(Vertex::Tip {
            index: vertex,
            label,
            half_edge,
        });

        half_edge
    }

    /// Adds an inner vertex with a ring of three unlinked half-edges and
    /// returns its primary half-edge.
    ///
    /// The other two half-edges are reached via `next` and `next.next`.
    pub fn add_inner(&mut self, support: Option<f64>) -> HalfEdgeIndex {
        let vertex = self.vertices.len();
        let first = self.half_edges.len();
        let ring = [first, first + 1, first + 2];

        for (i, &half_edge) in ring.iter().enumerate() {
            self.half_edges
                .push(HalfEdge::new(half_edge, vertex, ring[(i + 1) % 3]));
        }
        self.vertices.push(Vertex::Inner {
            index: vertex,
            support,
            ring,
        });

        first
    }

    /// Joins two half-edges into one edge with the given attributes.
    ///
    /// Sets `back` on both sides and stores `length`, `label` and `support`
    /// identically on both half-edges. A half-edge that was linked before is
    /// unlinked from its old partner first.
    ///
    /// # Panics
    /// Panics if an index is out of bounds or both indices are equal.
    pub fn link(
        &mut self,
        h1: HalfEdgeIndex,
        h2: HalfEdgeIndex,
        length: f64,
        label: String,
        support: Option<f64>,
    ) {
        assert_ne!(h1, h2, "Cannot link half-edge {h1} to itself");
        self.unlink(h1);
        self.unlink(h2);

        let first = &mut self.half_edges[h1];
        first.back = Some(h2);
        first.back_length = length;
        first.back_label = label.clone();
        first.back_support = support;

        let second = &mut self.half_edges[h2];
        second.back = Some(h1);
        second.back_length = length;
        second.back_label = label;
        second.back_support = support;
    }

    /// Removes the edge at `half_edge`, if any, resetting the edge attributes
    /// on both sides. Returns the former partner.
    pub fn unlink(&mut self, half_edge: HalfEdgeIndex) -> Option<HalfEdgeIndex> {
        let back = self.half_edges[half_edge].back?;
        for index in [half_edge, back] {
            let h = &mut self.half_edges[index];
            h.back = None;
            h.back_length = 0.0;
            h.back_label.clear();
            h.back_support = None;
        }
        Some(back)
    }

    /// Remembers `half_edge` as entry point of this tree.
    pub fn set_entry(&mut self, half_edge: HalfEdgeIndex) {
        self.entry = Some(half_edge);
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl RingTree {
    /// Returns the entry half-edge set by the parser, or `None`.
    pub fn entry(&self) -> Option<HalfEdgeIndex> {
        self.entry
    }

    /// Returns a reference to the half-edge at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn half_edge(&self, index: HalfEdgeIndex) -> &HalfEdge {
        &self.half_edges[index]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index]
    }

    /// Returns the vertex whose ring contains `half_edge`.
    pub fn vertex_of(&self, half_edge: HalfEdgeIndex) -> &Vertex {
        &self.vertices[self.half_edges[half_edge].vertex]
    }

    /// Returns the next half-edge in the ring of `half_edge`.
    #[inline]
    pub fn next(&self, half_edge: HalfEdgeIndex) -> HalfEdgeIndex {
        self.half_edges[half_edge].next
    }

    /// Returns the half-edge across the edge of `half_edge`, if linked.
    #[inline]
    pub fn back(&self, half_edge: HalfEdgeIndex) -> Option<HalfEdgeIndex> {
        self.half_edges[half_edge].back
    }

    /// Returns `true` if `half_edge` belongs to a tip.
    pub fn is_tip(&self, half_edge: HalfEdgeIndex) -> bool {
        self.vertex_of(half_edge).is_tip()
    }

    /// Returns an iterator over the ring of `half_edge`, starting with
    /// `half_edge` itself.
    pub fn ring(&self, half_edge: HalfEdgeIndex) -> RingIter<'_> {
        RingIter {
            tree: self,
            start: half_edge,
            current: Some(half_edge),
        }
    }

    /// Returns all vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns all half-edges.
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Returns an iterator over all edges, each given once as its pair of
    /// half-edges `(h, back)` with `h < back`.
    pub fn edges(&self) -> impl Iterator<Item = (HalfEdgeIndex, HalfEdgeIndex)> + '_ {
        self.half_edges
            .iter()
            .filter_map(|h| h.back.map(|b| (h.index, b)))
            .filter(|(h, b)| h < b)
    }

    /// Returns the number of tips.
    pub fn num_tips(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_tip()).count()
    }

    /// Returns the number of inner vertices (including a pseudo-root).
    pub fn num_inner(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_inner()).count()
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of half-edges.
    pub fn num_half_edges(&self) -> usize {
        self.half_edges.len()
    }

    /// Returns the number of edges (linked half-edge pairs).
    pub fn num_edges(&self) -> usize {
        self.edges().count()
    }

    /// Returns the labels of all tips in arena order.
    pub fn tip_labels(&self) -> Vec<&str> {
        self.vertices.iter().filter_map(|v| v.label()).collect()
    }

    /// Returns the half-edge of the tip with the given label, if any.
    pub fn find_tip(&self, label: &str) -> Option<HalfEdgeIndex> {
        self.vertices
            .iter()
            .find(|v| v.label() == Some(label))
            .map(|v| v.primary())
    }

    /// Returns the sum of all edge lengths, each edge counted once.
    pub fn total_branch_length(&self) -> f64 {
        self.edges()
            .map(|(h, _)| self.half_edges[h].back_length)
            .sum()
    }

    /// Returns `true` if every inner half-edge is linked, i.e. the tree was
    /// given with a trifurcating pseudo-root (or has no inner vertex).
    pub fn is_unrooted(&self) -> bool {
        self.vertices
            .iter()
            .filter(|v| v.is_inner())
            .flat_map(|v| v.half_edges())
            .all(|&h| self.half_edges[h].back.is_some())
    }

    /// Writes this tree in Newick format starting at `start` with default
    /// writer settings.
    ///
    /// See [NewickWriter] for details and options.
    pub fn to_newick(&self, start: HalfEdgeIndex) -> Result<String> {
        NewickWriter::new().write(self, start)
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl RingTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - All vertex and half-edge indices match their position in the arena
    /// - Every half-edge belongs to the ring of its vertex
    /// - Inner rings consist of three distinct half-edges and `next` applied
    ///   three times is the identity; tip rings have size one
    /// - `back` is symmetric, never points into the own ring, and both sides
    ///   carry equal length, label and support
    /// - All vertices are reachable and there is no cycle
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            let ring = vertex.half_edges();
            for &h in ring {
                if h >= self.half_edges.len() || self.half_edges[h].vertex != index {
                    return false;
                }
            }

            match vertex {
                Vertex::Tip { half_edge, .. } => {
                    if self.next(*half_edge) != *half_edge {
                        return false;
                    }
                }
                Vertex::Inner { ring, .. } => {
                    if ring[0] == ring[1] || ring[1] == ring[2] || ring[0] == ring[2] {
                        return false;
                    }
                    for (i, &h) in ring.iter().enumerate() {
                        if self.next(h) != ring[(i + 1) % 3] {
                            return false;
                        }
                        if self.next(self.next(self.next(h))) != h {
                            return false;
                        }
                    }
                }
            }
        }

        for (index, half_edge) in self.half_edges.iter().enumerate() {
            if half_edge.index != index || half_edge.vertex >= self.vertices.len() {
                return false;
            }
            if !self.vertices[half_edge.vertex].half_edges().contains(&index) {
                return false;
            }

            if let Some(back) = half_edge.back {
                let Some(other) = self.half_edges.get(back) else {
                    return false;
                };
                if other.back != Some(index) || other.vertex == half_edge.vertex {
                    return false;
                }
                if (other.back_length - half_edge.back_length).abs() > EPSILON
                    || other.back_label != half_edge.back_label
                    || other.back_support != half_edge.back_support
                {
                    return false;
                }
            }
        }

        // Connected and acyclic: a tree on n vertices has n - 1 edges and
        // reaches all of them. The walk does not terminate on a cycle, so
        // it is cut off after n + 1 steps.
        if self.vertices.is_empty() {
            return true;
        }
        if self.num_edges() + 1 != self.vertices.len() {
            return false;
        }
        let start = self.entry.unwrap_or(0);
        if start >= self.half_edges.len() {
            return false;
        }
        let reached = self
            .pre_order_iter(start)
            .take(self.vertices.len() + 1)
            .count();
        reached == self.vertices.len()
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
/// Iterator over the half-edges of one vertex ring.
///
/// Created by [RingTree::ring].
pub struct RingIter<'a> {
    tree: &'a RingTree,
    start: HalfEdgeIndex,
    current: Option<HalfEdgeIndex>,
}

impl Iterator for RingIter<'_> {
    type Item = HalfEdgeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let next = self.tree.next(current);
        self.current = if next == self.start { None } else { Some(next) };
        Some(current)
    }
}

impl RingTree {
    /// Returns an iterator over the tree in pre-order starting at `start`.
    ///
    /// Each vertex is visited exactly once and represented by the half-edge
    /// through which it is entered; the start vertex is represented by
    /// `start` itself. Children of a vertex are visited in ring order
    /// (`next.back`, `next.next.back`), and for the start vertex also
    /// `back` last, matching the order of the [NewickWriter].
    ///
    /// The iterator expects a tree: on an arena with a cycle it does not
    /// end. Check [`is_valid`](Self::is_valid) first for untrusted data.
    ///
    /// # Example
    /// ```
    /// use ringwick::parse_newick_str;
    ///
    /// let tree = parse_newick_str("(A:1,B:2,(C:1,D:1):0.5);").unwrap();
    /// let entry = tree.entry().unwrap();
    /// let tips: Vec<_> = tree
    ///     .pre_order_iter(entry)
    ///     .filter_map(|h| tree.vertex_of(h).label())
    ///     .collect();
    /// assert_eq!(tips, vec!["A", "B", "C", "D"]);
    /// ```
    pub fn pre_order_iter(&self, start: HalfEdgeIndex) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            stack: vec![(start, true)],
        }
    }
}

/// Iterator for pre-order traversal away from a start half-edge.
///
/// This iterator uses a stack-based approach to traverse the tree without
/// recursion, so it is safe for arbitrarily deep trees.
pub struct PreOrderIter<'a> {
    tree: &'a RingTree,
    stack: Vec<(HalfEdgeIndex, bool)>, // (half-edge, is start)
}

impl Iterator for PreOrderIter<'_> {
    type Item = HalfEdgeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let (half_edge, is_start) = self.stack.pop()?;

        // Ring order without the half-edge we came through, which for the
        // start vertex comes last instead
        let mut outgoing: Vec<HalfEdgeIndex> = self.tree.ring(half_edge).skip(1).collect();
        if is_start {
            outgoing.push(half_edge);
        }

        // Push in reverse, so first child is processed first
        for &h in outgoing.iter().rev() {
            if let Some(back) = self.tree.back(h) {
                self.stack.push((back, false));
            }
        }

        Some(half_edge)
    }
}
