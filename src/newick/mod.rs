//! Newick format parser and writer for rooted and unrooted phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick strings into
//! [RingTree]s and [NewickWriter] to write them back, starting from any
//! half-edge of the tree.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string, returns a [RingTree]
//! * [`parse_file`] - parses a file of `;`-terminated trees
//! * [`to_newick`] - writes a tree from a given half-edge
//!
//! # Full API
//! For more control, configure a [NewickParser] or [NewickWriter] and
//! provide data via any [ParserInput]:
//! * [`NewickParser::parse`] - parse a single tree at a position
//! * [`NewickParser::parse_all`] - parse all trees until end of input
//! * [`NewickParser::into_iter`] - obtain an iterator over trees
//!
//! # Format
//! The Newick dialect read here has the following grammar:
//! * `tree ::= node`
//! * `node ::= leaf | inner`
//! * `leaf ::= label`
//! * `inner ::= '(' child ',' child [',' child] ')' [support]`
//! * `child ::= node [':' number] ['[' text ']']`
//!
//! Furthermore:
//! * Labels run until the next `:`, `,`, `)` or `;`
//! * Spaces and tabs can occur between elements, newlines only between trees
//! * An inner vertex with three children is the pseudo-root of an unrooted
//!   tree; it can only occur at the top level
//! * A node label consisting only of digits and not starting with `0` is
//!   read as support value of the inner vertex
//! * The bracketed text after a branch length is the label of that branch

mod defs;
pub mod parser;
pub mod writer;

pub use defs::{DEFAULT_LENGTH_PRECISION, MIN_SIGNIFICANT_DIGITS};
pub use parser::{NewickIterator, NewickParser};
pub use writer::{BranchLengthFormat, NewickWriter};

use crate::model::{HalfEdgeIndex, RingTree};
use crate::newick::parser::{parse_branch_label, parse_branch_length};
use crate::parser::scan::{skip_layout, skip_whitespace};
use crate::parser::{InMemoryInput, ParserInput, ParsingError, Result};
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single tree from `input` starting at `pos`, returning the tree
/// and the position just past it.
///
/// A trailing `;` is neither required nor consumed.
/// See [`NewickParser::parse`] for details.
pub fn parse<I: ParserInput + ?Sized>(input: &I, pos: usize) -> Result<(RingTree, usize)> {
    NewickParser::new().parse(input, pos)
}

/// Parses a single Newick string to obtain a [RingTree].
///
/// This is a convenience function for quick parsing of a single Newick string
/// using default settings. The string may be terminated by `;`, but nothing
/// except whitespace may follow.
///
/// # Returns
/// * [RingTree] - Tree parsed from the string, with its
///   [entry](RingTree::entry) at the top-level vertex
/// * [ParsingError](crate::parser::ParsingError) - If the string is not valid
///
/// # Example
/// ```
/// use ringwick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata:1,Fratercula_arctica:1,Fratercula_corniculata:1);")?;
/// assert!(tree.is_unrooted());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<RingTree> {
    let input = newick.as_ref();
    let mut newick_parser = NewickParser::new();

    // Tree, optional root branch, optional ';'
    let (tree, pos) = newick_parser.parse(input, 0)?;
    let (_, pos) = parse_branch_length(input, pos)?;
    let (_, pos) = parse_branch_label(input, pos)?;
    let mut pos = skip_whitespace(input, pos);
    if input.char_at(pos) == Some(b';') {
        pos += 1;
    }

    let pos = skip_layout(input, pos);
    if pos < input.size() {
        return Err(ParsingError::unexpected_character(
            input,
            pos,
            "end of input",
        ));
    }

    Ok(tree)
}

/// Parses a file containing `;`-terminated Newick strings, separated by
/// whitespace or newlines.
///
/// The file is loaded into memory entirely.
///
/// # Example
/// ```no_run
/// use ringwick::newick::parse_file;
///
/// let trees = parse_file("RAxML_bipartitions.nwk")?;
/// println!("Parsed {} trees", trees.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<RingTree>> {
    let input = InMemoryInput::from_file(path)?;
    NewickParser::new().parse_all(&input)
}

/// Writes `tree` in Newick format starting at `start`, using default
/// [NewickWriter] settings.
pub fn to_newick(tree: &RingTree, start: HalfEdgeIndex) -> Result<String> {
    NewickWriter::new().write(tree, start)
}

/// Writes `trees` to a file, one Newick string per line, each printed from
/// its entry half-edge.
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[RingTree]) -> Result<()> {
    NewickWriter::new().write_file(path, trees)
}
