//! Newick format writing for [RingTree]s.
//!
//! Printing can start from any half-edge. The vertex printing starts from is
//! treated as root and written with all its linked neighbours as children;
//! every other inner vertex is written with the two neighbours away from the
//! printing start, followed by the length of the edge towards it.

use crate::model::{HalfEdgeIndex, RingTree, Vertex};
use crate::newick::defs::{BUFFER_CHARS, DEFAULT_LENGTH_PRECISION, MIN_SIGNIFICANT_DIGITS};
use crate::parser::parsing_error::{ParsingError, ParsingErrorType, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Format used to write branch lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchLengthFormat {
    /// Fixed-point with the given number of fraction digits, falling back to
    /// the shortest form for lengths that would otherwise keep fewer than
    /// [MIN_SIGNIFICANT_DIGITS] significant digits
    Fixed(usize),
    /// Shortest representation that parses back to the same `f64`
    Shortest,
}

impl Default for BranchLengthFormat {
    fn default() -> Self {
        BranchLengthFormat::Fixed(DEFAULT_LENGTH_PRECISION)
    }
}

// =#========================================================================#=
// NEWICK WRITER
// =#========================================================================$=
/// Writer (configuration) for Newick strings of a [RingTree].
///
/// # Configuration
/// * [`with_length_format(format)`](Self::with_length_format)
///     - How branch lengths are written, by default
///       [fixed](BranchLengthFormat::Fixed) with 20 fraction digits.
/// * [`with_support()`](Self::with_support)
///     - Writes the support of inner vertices as node label after `)`, if it
///       is a positive whole number (so that it parses back as support).
/// * [`with_branch_labels()`](Self::with_branch_labels)
///     - Writes non-empty branch labels as `[label]` after the branch length.
///
/// # Example
/// ```
/// use ringwick::newick::{BranchLengthFormat, NewickWriter};
/// use ringwick::parse_newick_str;
///
/// let tree = parse_newick_str("(A:1,B:2,(C:3,D:4)90:5);").unwrap();
/// let writer = NewickWriter::new()
///     .with_length_format(BranchLengthFormat::Shortest)
///     .with_support();
///
/// let newick = writer.write(&tree, tree.entry().unwrap()).unwrap();
/// assert_eq!(newick, "(A:1,B:2,(C:3,D:4)90:5);");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewickWriter {
    length_format: BranchLengthFormat,
    write_support: bool,
    write_branch_labels: bool,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickWriter {
    /// Creates a new [NewickWriter] with default settings:
    /// - fixed branch lengths with 20 fraction digits
    /// - no support values, no branch labels
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the format of branch lengths.
    pub fn with_length_format(mut self, length_format: BranchLengthFormat) -> Self {
        self.length_format = length_format;
        self
    }

    /// Configures the writer to write vertex supports as node labels.
    pub fn with_support(mut self) -> Self {
        self.write_support = true;
        self
    }

    /// Configures the writer to write branch labels in brackets.
    pub fn with_branch_labels(mut self) -> Self {
        self.write_branch_labels = true;
        self
    }
}

// ============================================================================
// Writing (pub)
// ============================================================================
impl NewickWriter {
    /// Returns the Newick representation of `tree` with closing semicolon,
    /// printed from the vertex of `start`.
    ///
    /// If `start` belongs to a tip, printing starts from the inner vertex the
    /// tip is attached to.
    ///
    /// # Errors
    /// [NoPrintableRoot](ParsingErrorType::NoPrintableRoot) if `start` is out
    /// of range (e.g. in an empty tree), an unlinked tip, a tip attached to another tip, or an inner vertex with
    /// fewer than two linked half-edges.
    pub fn write(&self, tree: &RingTree, start: HalfEdgeIndex) -> Result<String> {
        let root = find_printable_root(tree, start)?;

        let mut newick = String::with_capacity(self.estimate_newick_len(tree));
        self.write_root(tree, root, &mut newick)?;
        Ok(newick)
    }

    /// Writes each tree from its [entry](RingTree::entry) (or its first
    /// half-edge) to a file in Newick format, one tree per line.
    ///
    /// # Errors
    /// Returns an IO error if writing fails, or a printing error.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, trees: &[RingTree]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for tree in trees {
            let newick = self.write(tree, tree.entry().unwrap_or(0))?;
            writer.write_all(newick.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;
        debug!(trees = trees.len(), "wrote newick file");
        Ok(())
    }
}

// ============================================================================
// Writing
// ============================================================================
impl NewickWriter {
    /// Writes the vertex of `root` with all linked neighbours as children:
    /// `next.back`, `next.next.back` and `back`, skipping unlinked ones.
    fn write_root(&self, tree: &RingTree, root: HalfEdgeIndex, newick: &mut String) -> Result<()> {
        let second = tree.next(root);
        let last = tree.next(second);
        let children: Vec<HalfEdgeIndex> = [second, last, root]
            .iter()
            .filter_map(|&h| tree.back(h))
            .collect();

        if children.len() < 2 {
            return Err(ParsingError::without_context(
                ParsingErrorType::NoPrintableRoot(format!(
                    "inner vertex has only {} linked half-edge(s)",
                    children.len()
                )),
                root,
            ));
        }

        newick.push('(');
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            self.write_subtree(tree, child, 0.0, newick)?;
        }
        newick.push_str(");");

        Ok(())
    }

    /// Writes the subtree entered via `half_edge`, followed by the length of
    /// the edge of `half_edge` (plus `extra_length`).
    ///
    /// An inner vertex with only one linked half-edge away from the caller
    /// (the former root of a rooted tree) is suppressed and its remaining
    /// child written in its place with both edge lengths summed.
    fn write_subtree(
        &self,
        tree: &RingTree,
        half_edge: HalfEdgeIndex,
        extra_length: f64,
        newick: &mut String,
    ) -> Result<()> {
        let edge = tree.half_edge(half_edge);
        let length = edge.back_length() + extra_length;

        match tree.vertex_of(half_edge) {
            Vertex::Tip { label, .. } => {
                newick.push_str(label);
            }
            Vertex::Inner { support, .. } => {
                let second = tree.next(half_edge);
                let last = tree.next(second);
                let children: Vec<HalfEdgeIndex> = [second, last]
                    .iter()
                    .filter_map(|&h| tree.back(h))
                    .collect();

                match children.as_slice() {
                    [left, right] => {
                        newick.push('(');
                        self.write_subtree(tree, *left, 0.0, newick)?;
                        newick.push(',');
                        self.write_subtree(tree, *right, 0.0, newick)?;
                        newick.push(')');
                        if self.write_support {
                            push_support(newick, *support);
                        }
                    }
                    [only] => {
                        return self.write_subtree(tree, *only, length, newick);
                    }
                    _ => {
                        return Err(ParsingError::without_context(
                            ParsingErrorType::NoPrintableRoot(
                                "inner vertex without linked children".to_string(),
                            ),
                            half_edge,
                        ));
                    }
                }
            }
        }

        newick.push(':');
        self.push_length(newick, length);
        if self.write_branch_labels {
            if let Some(label) = edge.back_label() {
                newick.push('[');
                newick.push_str(label);
                newick.push(']');
            }
        }

        Ok(())
    }

    /// Writes `length` in the configured format.
    ///
    /// A fixed-precision length that would keep fewer than
    /// [MIN_SIGNIFICANT_DIGITS] significant digits and not read back as the
    /// same value (e.g. `1.5e-25` with 20 fraction digits) is written in
    /// shortest round-trip form instead.
    fn push_length(&self, newick: &mut String, length: f64) {
        match self.length_format {
            BranchLengthFormat::Fixed(precision) => {
                let fixed = format!("{length:.precision$}");
                if fixed_loses_digits(&fixed, length, precision) {
                    newick.push_str(&length.to_string());
                } else {
                    newick.push_str(&fixed);
                }
            }
            BranchLengthFormat::Shortest => {
                newick.push_str(&length.to_string());
            }
        }
    }

    /// Estimates the length of the Newick string of `tree`, used to
    /// pre-allocate the output.
    fn estimate_newick_len(&self, tree: &RingTree) -> usize {
        // Each inner vertex: "(,)" ~= 3 chars
        const INNER_VERTEX_CHARS: usize = 3;

        let branch_length_chars = match self.length_format {
            BranchLengthFormat::Fixed(precision) => precision + 4,
            BranchLengthFormat::Shortest => 20,
        };
        let label_capacity: usize = tree.tip_labels().iter().map(|l| l.len()).sum();

        tree.num_inner() * INNER_VERTEX_CHARS
            + label_capacity
            + tree.num_edges() * branch_length_chars
            + BUFFER_CHARS
    }
}

/// Whether `fixed`, the rendering of `length` with `precision` fraction
/// digits, drops below [MIN_SIGNIFICANT_DIGITS] and changes the value.
fn fixed_loses_digits(fixed: &str, length: f64, precision: usize) -> bool {
    if length == 0.0 || !length.is_finite() {
        return false;
    }
    let magnitude = length.abs().log10().floor() as i64;
    let significant = precision as i64 + magnitude + 1;
    significant < MIN_SIGNIFICANT_DIGITS as i64 && fixed.parse::<f64>() != Ok(length)
}

/// Writes `support` if it is a positive whole number.
fn push_support(newick: &mut String, support: Option<f64>) {
    if let Some(support) = support {
        if support >= 1.0 && support.is_finite() && support.fract() == 0.0 {
            newick.push_str(&format!("{support:.0}"));
        }
    }
}

/// Finds the half-edge of the inner vertex to print from.
///
/// Inner half-edges are returned as is. For a tip, the first linked of
/// `back`, `next.back`, `next.next.back` is taken.
fn find_printable_root(tree: &RingTree, start: HalfEdgeIndex) -> Result<HalfEdgeIndex> {
    if start >= tree.num_half_edges() {
        return Err(ParsingError::without_context(
            ParsingErrorType::NoPrintableRoot(format!(
                "no half-edge {start} in tree with {} half-edge(s)",
                tree.num_half_edges()
            )),
            start,
        ));
    }
    if !tree.is_tip(start) {
        return Ok(start);
    }

    let second = tree.next(start);
    let last = tree.next(second);
    let root = [start, second, last]
        .iter()
        .find_map(|&h| tree.back(h))
        .ok_or_else(|| {
            ParsingError::without_context(
                ParsingErrorType::NoPrintableRoot("cannot print single unlinked tip".to_string()),
                start,
            )
        })?;

    if tree.is_tip(root) {
        return Err(ParsingError::without_context(
            ParsingErrorType::NoPrintableRoot(
                "could not find inner vertex, tip is attached to another tip".to_string(),
            ),
            start,
        ));
    }

    Ok(root)
}
