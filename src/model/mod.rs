//! Data model for rooted and unrooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [RingTree], which uses the arena pattern to
//! store [Vertex] descriptors and [HalfEdge]s, referenced by [VertexIndex]
//! and [HalfEdgeIndex].
//!
//! | Vertex | Half-edges | Data |
//! |--------|------------|------|
//! | Tip    | 1 (ring of itself) | label |
//! | Inner  | 3 (cyclic ring via `next`) | optional support |
//!
//! An edge is a pair of half-edges linked via `back`. Branch length, branch
//! label and branch support are stored on both half-edges of an edge, so
//! they can be read from either direction.
//!
//! The same inner vertex type serves as bifurcating vertex (two children
//! plus the connection towards its parent) and as trifurcating pseudo-root
//! of an unrooted tree. Since no half-edge is privileged as pointing towards
//! the root, traversal and printing can start anywhere.

pub mod half_edge;
pub mod tree;
pub mod vertex;

pub use half_edge::{HalfEdge, HalfEdgeIndex, NO_SUPPORT};
pub use tree::{PreOrderIter, RingIter, RingTree};
pub use vertex::{Vertex, VertexIndex};
