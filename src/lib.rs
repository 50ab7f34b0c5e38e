//! Ringwick is a library to parse and write rooted and unrooted
//! phylogenetic trees in Newick format.
//!
//! Trees are stored as rings of half-edges: every inner vertex owns three
//! half-edges, every tip one, and each edge is a pair of half-edges linked
//! to each other. The same vertex type thus represents bifurcating vertices
//! as well as the trifurcating pseudo-root of an unrooted tree, and no edge
//! is privileged as pointing towards a root.
//!
//! Core functionality provided:
//! - Parser: recursive-descent parser reading trees with a bifurcating or a
//!   trifurcating top-level vertex, branch lengths, bracketed branch labels,
//!   and integer node labels as support values.
//! - Tree model: [RingTree] with [Vertex] and [HalfEdge] in an arena,
//!   referenced by index; see [crate::model].
//! - Writer: prints a tree starting from *any* half-edge, treating that
//!   vertex as (pseudo-)root.
//! - Input: anything implementing [ParserInput](crate::parser::ParserInput),
//!   e.g. `&str`, byte slices, or files loaded into memory.
//!
//! Limitations:
//! - Vertices have degree at most three (no multifurcations besides the
//!   pseudo-root)
//! - Labels are unquoted, newlines only between trees
//!
//! # Example
//! ```
//! use ringwick::parse_newick_str;
//! use ringwick::newick::NewickWriter;
//!
//! let tree = parse_newick_str("(A:0.1,B:0.2,(C:0.3,D:0.4)100:0.5);").unwrap();
//! assert_eq!(tree.num_tips(), 4);
//! assert_eq!(tree.num_inner(), 2);
//!
//! // Print from the tip C, i.e. from the inner vertex C is attached to
//! let c = tree.find_tip("C").unwrap();
//! let newick = NewickWriter::new().write(&tree, c).unwrap();
//! let reparsed = parse_newick_str(&newick).unwrap();
//! assert_eq!(reparsed.num_tips(), 4);
//! ```

pub mod model;
pub mod newick;
pub mod parser;

pub use crate::model::{HalfEdge, HalfEdgeIndex, RingTree, Vertex, VertexIndex};
pub use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [RingTree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<RingTree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse a file containing a list of `;`-terminated Newick strings using
/// default settings.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Vec<RingTree>, ParsingError> {
    newick::parse_file(path)
}
