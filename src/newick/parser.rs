//! Structs and logic to parse Newick strings into a [RingTree].
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse single trees, all trees of an input, or lazily via a
//! [NewickIterator]. The recursive-descent routines themselves operate on a
//! [ParserInput] and a cursor position and return the position just past
//! whatever they consumed.

use crate::model::{HalfEdgeIndex, RingTree};
use crate::newick::defs::DEFAULT_NUM_TIPS_GUESS;
use crate::parser::parser_input::ParserInput;
use crate::parser::parsing_error::{ParsingError, Result};
use crate::parser::scan::{
    expect_byte, find_end_of_branch, find_float, find_next, is_digit, skip_layout,
    skip_whitespace,
};
use tracing::{debug, trace, warn};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick trees with either a bifurcating or a
/// trifurcating (pseudo-root) top-level vertex.
///
/// # Configuration
/// * [`with_num_tips(num_tips)`](Self::with_num_tips)
///     - Can be configured with number of tips in trees to parse, which is
///       used to pre-allocate the tree arena. Otherwise it is inferred from
///       the first parsed tree and then reused.
///
/// # Parsing
/// * [`parse`](Self::parse) - Parse a single tree starting at a position,
///   without requiring a trailing `;`
/// * [`parse_tree`](Self::parse_tree) - Parse a single `;`-terminated tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - Parse trees lazily
///
/// # Example
/// ```
/// use ringwick::newick::NewickParser;
///
/// let input = "(A_meleagrides:1.0,A_vulturinum:1.0,(N_meleagris:1.0,G_plumifera:1.0)97:0.5);";
/// let mut parser = NewickParser::new();
///
/// let (tree, end) = parser.parse(input, 0).unwrap();
/// assert_eq!(tree.num_tips(), 4);
/// assert_eq!(&input[end..], ";");
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    know_num_tips: bool,
    num_tips: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings:
    /// - Number of tips is unknown (will be counted during parsing)
    pub fn new() -> Self {
        Self {
            know_num_tips: false,
            num_tips: DEFAULT_NUM_TIPS_GUESS,
        }
    }

    /// Sets the expected number of tips in each parsed tree.
    ///
    /// This allows pre-allocation of the tree arena.
    /// If not set, the parser will count tips of the first tree.
    pub fn with_num_tips(mut self, num_tips: usize) -> Self {
        self.num_tips = num_tips;
        self.know_num_tips = true;
        self
    }

    /// Returns the number of tips used to pre-allocate trees.
    pub fn num_tips(&self) -> usize {
        self.num_tips
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses a single tree starting at byte offset `pos`.
    ///
    /// Leading spaces and tabs are skipped. A trailing `;` is neither
    /// required nor consumed. The returned tree has its
    /// [entry](RingTree::entry) set to the half-edge of the top-level vertex:
    /// for a pseudo-root this is the half-edge towards its third child, for a
    /// bifurcating top-level vertex it is its unlinked primary half-edge.
    ///
    /// # Returns
    /// * `Ok((RingTree, usize))` - The tree and the position just past it
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse<I: ParserInput + ?Sized>(
        &mut self,
        input: &I,
        pos: usize,
    ) -> Result<(RingTree, usize)> {
        let mut tree_parser = TreeParser {
            input,
            tree: RingTree::with_num_tips(self.num_tips),
        };

        let pos = skip_whitespace(input, pos);
        let start = pos;
        let (entry, end) = tree_parser.parse_node(pos, true)?;
        let mut tree = tree_parser.tree;
        tree.set_entry(entry);

        // Having parsed a full tree,
        // the number of tips in a tree is now known
        if !self.know_num_tips {
            self.num_tips = tree.num_tips();
            self.know_num_tips = true;
        }

        debug!(
            tips = tree.num_tips(),
            inner = tree.num_inner(),
            bytes = end - start,
            unrooted = tree.is_unrooted(),
            "parsed newick tree"
        );

        Ok((tree, end))
    }

    /// Parses a single tree terminated by `;` and returns the position just
    /// past the `;`.
    ///
    /// A rooted tree may carry a branch length and branch label on its root
    /// (e.g. `((A,B),C):0.0;`); these have no edge to attach to and are
    /// skipped.
    pub fn parse_tree<I: ParserInput + ?Sized>(
        &mut self,
        input: &I,
        pos: usize,
    ) -> Result<(RingTree, usize)> {
        let (tree, pos) = self.parse(input, pos)?;

        let (root_length, pos) = parse_branch_length(input, pos)?;
        let (root_label, pos) = parse_branch_label(input, pos)?;
        if root_length != 0.0 || !root_label.is_empty() {
            trace!(root_length, root_label = %root_label, "skipped root branch");
        }

        let pos = skip_whitespace(input, pos);
        let pos = expect_byte(input, pos, b';')?;
        Ok((tree, pos))
    }

    /// Parses all `;`-terminated trees until the end of the input.
    ///
    /// Trees can be separated by any whitespace including newlines.
    ///
    /// # Returns
    /// * `Ok(Vec<RingTree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all<I: ParserInput + ?Sized>(&mut self, input: &I) -> Result<Vec<RingTree>> {
        let mut trees = Vec::new();
        let mut pos = skip_layout(input, 0);
        while pos < input.size() {
            let (tree, end) = self.parse_tree(input, pos)?;
            trees.push(tree);
            pos = skip_layout(input, end);
        }
        Ok(trees)
    }

    /// Consumes the parser and returns an iterator over the `;`-terminated
    /// trees of `input`.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    pub fn into_iter<I: ParserInput>(self, input: I) -> NewickIterator<I> {
        NewickIterator {
            parser: self,
            input,
            pos: 0,
            done: false,
        }
    }
}

// ============================================================================
// Branch scanning (pub)
// ============================================================================
/// Parses an optional branch length `:number` at `pos`.
///
/// Skips spaces and tabs before and after the `:`. If no `:` follows, the
/// length is `0.0` and the returned position is the one after the skipped
/// whitespace.
///
/// # Errors
/// [MalformedNumber](crate::parser::ParsingErrorType::MalformedNumber) if a
/// `:` is not followed by a number.
///
/// # Example
/// ```
/// use ringwick::newick::parser::parse_branch_length;
///
/// assert_eq!(parse_branch_length("A:1.5e-3,", 1).unwrap(), (1.5e-3, 8));
/// assert_eq!(parse_branch_length("A,", 1).unwrap(), (0.0, 1));
/// ```
pub fn parse_branch_length<I: ParserInput + ?Sized>(input: &I, pos: usize) -> Result<(f64, usize)> {
    let pos = skip_whitespace(input, pos);
    if input.char_at(pos) != Some(b':') {
        return Ok((0.0, pos));
    }

    let start = skip_whitespace(input, pos + 1);
    let end = find_float(input, start);
    let text = input.substring(start, end).unwrap_or_default();

    let length = text
        .parse::<f64>()
        .map_err(|_| ParsingError::malformed_number(input, start, text.to_string()))?;
    Ok((length, end))
}

/// Parses an optional bracketed branch label `[text]` at `pos`.
///
/// Returns the text between the brackets, or an empty label and the
/// position unchanged if no `[` follows. An empty `[]` is logged as warning.
///
/// # Errors
/// [UnterminatedToken](crate::parser::ParsingErrorType::UnterminatedToken) if
/// the closing `]` is missing.
pub fn parse_branch_label<I: ParserInput + ?Sized>(
    input: &I,
    pos: usize,
) -> Result<(String, usize)> {
    let start = skip_whitespace(input, pos);
    if input.char_at(start) != Some(b'[') {
        return Ok((String::new(), pos));
    }

    let end = find_next(input, start + 1, b']')?;
    let label = input.substring(start + 1, end).unwrap_or_default();
    if label.is_empty() {
        warn!(position = start, "empty branch label");
    }
    Ok((label.into_owned(), end + 1))
}

/// Interprets a node label as support value.
///
/// Only non-empty labels consisting of digits and not starting with `0`
/// count as support; everything else yields `None`.
///
/// # Example
/// ```
/// use ringwick::newick::parser::parse_support_label;
///
/// assert_eq!(parse_support_label("100"), Some(100.0));
/// assert_eq!(parse_support_label("07"), None);
/// assert_eq!(parse_support_label("0.95"), None);
/// ```
pub fn parse_support_label(label: &str) -> Option<f64> {
    let bytes = label.as_bytes();
    let is_support = !bytes.is_empty() && bytes[0] != b'0' && bytes.iter().all(|&b| is_digit(b));
    if is_support {
        label.parse::<f64>().ok()
    } else {
        None
    }
}

// ============================================================================
// Parsing
// ============================================================================
/// A parsed child of an inner vertex together with its incoming edge data.
struct ParsedChild {
    half_edge: HalfEdgeIndex,
    length: f64,
    label: String,
}

/// Recursive-descent state of a single tree: the input and the tree built so
/// far. Positions are passed through explicitly.
struct TreeParser<'a, I: ParserInput + ?Sized> {
    input: &'a I,
    tree: RingTree,
}

impl<I: ParserInput + ?Sized> TreeParser<'_, I> {
    /// Parses a vertex (either inner vertex or leaf):
    /// - Skips leading whitespace
    /// - Dispatches to `parse_inner_node` if starts with `(`, otherwise `parse_leaf`
    ///
    /// # Arguments
    /// * `pos` - Position to start at
    /// * `top_level` - Whether this is the outermost vertex, the only one
    ///   allowed to have three children
    ///
    /// # Returns
    /// - half-edge of the parsed vertex that is to be linked by the caller,
    ///   and the position after it
    fn parse_node(&mut self, pos: usize, top_level: bool) -> Result<(HalfEdgeIndex, usize)> {
        let pos = skip_whitespace(self.input, pos);
        if self.input.char_at(pos) == Some(b'(') {
            self.parse_inner_node(pos, top_level)
        } else {
            self.parse_leaf(pos)
        }
    }

    /// Parses a leaf label up to the next `:`, `,`, `)` or `;` and adds a tip.
    fn parse_leaf(&mut self, pos: usize) -> Result<(HalfEdgeIndex, usize)> {
        let pos = skip_whitespace(self.input, pos);
        let end = find_end_of_branch(self.input, pos)?;
        let label = self.substring(pos, end);
        let label = label.trim_end_matches([' ', '\t']).to_string();
        trace!(label = %label, position = pos, "parsed leaf");

        Ok((self.tree.add_tip(label), end))
    }

    /// Parses an inner vertex, adds it to the tree, and returns its primary
    /// half-edge:
    /// - `(left, right)[support]` - bifurcating, primary half-edge unlinked
    /// - `(left, right, third)` - pseudo-root, all half-edges linked; only at
    ///   the top level, as its primary half-edge has no slot left for a parent
    fn parse_inner_node(
        &mut self,
        pos: usize,
        top_level: bool,
    ) -> Result<(HalfEdgeIndex, usize)> {
        let pos = skip_whitespace(self.input, pos);
        let pos = expect_byte(self.input, pos, b'(')?;

        // Parse: "left,"
        let (left, pos) = self.parse_child(pos)?;
        let pos = skip_whitespace(self.input, pos);
        let pos = expect_byte(self.input, pos, b',')?;

        // Parse: "right"
        let (right, pos) = self.parse_child(pos)?;
        let pos = skip_whitespace(self.input, pos);

        match self.input.char_at(pos) {
            Some(b',') if !top_level => {
                Err(ParsingError::unexpected_character(self.input, pos, ")"))
            }
            Some(b',') => {
                // Second comma: three children, so this is the pseudo-root
                let (third, pos) = self.parse_child(pos + 1)?;
                let pos = skip_whitespace(self.input, pos);
                let pos = expect_byte(self.input, pos, b')')?;
                let pos = skip_whitespace(self.input, pos);

                let vertex = self.tree.add_inner(None);
                let second = self.tree.next(vertex);
                let last = self.tree.next(second);
                self.link_child(left, second, None);
                self.link_child(right, last, None);
                self.link_child(third, vertex, None);
                trace!(position = pos, "parsed pseudo-root");

                Ok((vertex, pos))
            }
            Some(b')') => {
                // Node label after ')' up to the next terminator,
                // interpreted as support if it is a plain positive integer.
                // The outermost vertex may also end with the input.
                let start = pos + 1;
                let end = match find_end_of_branch(self.input, start) {
                    Ok(end) => end,
                    Err(_) if top_level => self.input.size(),
                    Err(err) => return Err(err),
                };
                let node_label = self.substring(start, end);
                let support = parse_support_label(node_label.trim());

                let vertex = self.tree.add_inner(support);
                let second = self.tree.next(vertex);
                let last = self.tree.next(second);
                self.link_child(left, second, support);
                self.link_child(right, last, support);
                trace!(position = end, ?support, "parsed inner vertex");

                Ok((vertex, end))
            }
            _ => Err(ParsingError::unexpected_character(self.input, pos, "',' or ')'")),
        }
    }

    /// Parses `node[:length][[label]]`.
    fn parse_child(&mut self, pos: usize) -> Result<(ParsedChild, usize)> {
        let (half_edge, pos) = self.parse_node(pos, false)?;
        let (length, pos) = parse_branch_length(self.input, pos)?;
        let (label, pos) = parse_branch_label(self.input, pos)?;
        Ok((
            ParsedChild {
                half_edge,
                length,
                label,
            },
            pos,
        ))
    }

    /// Links a parsed child to a ring slot of its new parent vertex.
    fn link_child(&mut self, child: ParsedChild, slot: HalfEdgeIndex, support: Option<f64>) {
        self.tree
            .link(child.half_edge, slot, child.length, child.label, support);
    }

    /// Substring within bounds already checked by the scanners.
    fn substring(&self, start: usize, end: usize) -> String {
        self.input
            .substring(start, end)
            .map(|s| s.into_owned())
            .unwrap_or_default()
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse `;`-terminated Newick trees.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<RingTree, ParsingError>` for each tree and stops after the
/// first error.
pub struct NewickIterator<I: ParserInput> {
    parser: NewickParser,
    input: I,
    pos: usize,
    done: bool,
}

impl<I: ParserInput> NewickIterator<I> {
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser {
        self.parser
    }

    /// Returns the current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<I: ParserInput> Iterator for NewickIterator<I> {
    type Item = Result<RingTree>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.pos = skip_layout(&self.input, self.pos);
        if self.pos >= self.input.size() {
            self.done = true;
            return None;
        }

        match self.parser.parse_tree(&self.input, self.pos) {
            Ok((tree, end)) => {
                self.pos = end;
                Some(Ok(tree))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    #[test]
    fn test_branch_length_absent_keeps_position() {
        let input = "(A,B)";
        assert_eq!(parse_branch_length(input, 2).unwrap(), (0.0, 2));
    }

    #[test]
    fn test_branch_length_with_whitespace() {
        let input = "A : 2.5,";
        assert_eq!(parse_branch_length(input, 1).unwrap(), (2.5, 7));
    }

    #[test]
    fn test_branch_length_missing_number() {
        let err = parse_branch_length("A:,B", 1).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::MalformedNumber(String::new()));
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_branch_length_garbage_number() {
        let err = parse_branch_length("A:1.2.3,B", 1).unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::MalformedNumber("1.2.3".to_string())
        );
    }

    #[test]
    fn test_branch_label() {
        let input = "A:1.5[comment],B";
        assert_eq!(
            parse_branch_label(input, 5).unwrap(),
            ("comment".to_string(), 14)
        );
        assert_eq!(parse_branch_label(input, 14).unwrap(), (String::new(), 14));
    }

    #[test]
    fn test_empty_branch_label_is_not_fatal() {
        assert_eq!(parse_branch_label("[]", 0).unwrap(), (String::new(), 2));
    }

    #[test]
    fn test_unclosed_branch_label() {
        let err = parse_branch_label("A:1[oops,B:2", 3).unwrap_err();
        assert!(matches!(
            err.kind(),
            ParsingErrorType::UnterminatedToken { .. }
        ));
    }

    #[test]
    fn test_support_labels() {
        assert_eq!(parse_support_label("100"), Some(100.0));
        assert_eq!(parse_support_label("1"), Some(1.0));
        assert_eq!(parse_support_label("0"), None);
        assert_eq!(parse_support_label("07"), None);
        assert_eq!(parse_support_label("abc"), None);
        assert_eq!(parse_support_label(""), None);
        assert_eq!(parse_support_label("9a"), None);
    }

    #[test]
    fn test_nested_pseudo_root_rejected() {
        let err = NewickParser::new().parse("((A,B,C),D,E)", 0).unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::UnexpectedCharacter {
                expected: ")".to_string(),
                found: ','
            }
        );
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn test_rooted_tree_without_semicolon() {
        let input = "((A,B),C)";
        let (tree, end) = NewickParser::new().parse(input, 0).unwrap();
        assert_eq!(end, input.len());
        assert_eq!(tree.num_tips(), 3);
        assert_eq!(tree.back(tree.entry().unwrap()), None);

        // Below the top level a missing terminator is still an error
        let err = NewickParser::new().parse("(A,(B,C)", 0).unwrap_err();
        assert!(matches!(
            err.kind(),
            ParsingErrorType::UnterminatedToken { .. }
        ));
    }

    #[test]
    fn test_num_tips_remembered() {
        let mut parser = NewickParser::new();
        parser.parse("(A,B,(C,D))", 0).unwrap();
        assert_eq!(parser.num_tips(), 4);
    }
}
