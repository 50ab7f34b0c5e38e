//! Lexical helpers operating on a [ParserInput] and a cursor position.
//!
//! All helpers are pure: they take a position and return the position after
//! whatever they scanned. Every scan is bounded by the input size, so running
//! into the end of the input either stops the scan (for optional tokens) or
//! yields an [UnterminatedToken](crate::parser::ParsingErrorType::UnterminatedToken)
//! error (for tokens that need a terminator).

use crate::parser::parser_input::ParserInput;
use crate::parser::parsing_error::{ParsingError, Result};

/// Bytes terminating a tip label or a node label.
///
/// Besides `:`, `,` and `)`, the tree terminator `;` ends a label, so that
/// the node label scan after the outermost `)` of a rooted tree stops there.
pub const BRANCH_TERMINATORS: &[u8] = b":,);";

/// Returns `true` for ASCII digits.
#[inline]
pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` for the whitespace allowed within a tree: space and tab.
///
/// Newlines are not whitespace inside a tree; see [skip_layout].
#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Returns `true` for bytes that can occur in a floating point literal:
/// digits, `.`, `e`, `E`, `-` and `+`.
#[inline]
pub fn is_float_char(c: u8) -> bool {
    is_digit(c) || matches!(c, b'.' | b'e' | b'E' | b'-' | b'+')
}

/// Skips spaces and tabs starting at `pos` and returns the position of the
/// first other byte (or the input size).
pub fn skip_whitespace<I: ParserInput + ?Sized>(input: &I, mut pos: usize) -> usize {
    while input.char_at(pos).is_some_and(is_space) {
        pos += 1;
    }
    pos
}

/// Skips all ASCII whitespace including newlines.
///
/// Only used between trees of a multi-tree input.
pub fn skip_layout<I: ParserInput + ?Sized>(input: &I, mut pos: usize) -> usize {
    while input.char_at(pos).is_some_and(|c| c.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

/// Finds the end of a tip or node label: the position of the next `:`, `,`,
/// `)` or `;`.
///
/// # Errors
/// [UnterminatedToken](crate::parser::ParsingErrorType::UnterminatedToken)
/// if the input ends first.
pub fn find_end_of_branch<I: ParserInput + ?Sized>(input: &I, pos: usize) -> Result<usize> {
    find_any(input, pos, BRANCH_TERMINATORS)
        .ok_or_else(|| ParsingError::unterminated_token(input, input.size(), "one of ':,);'"))
}

/// Finds the next occurrence of `target` at or after `pos`.
///
/// # Errors
/// [UnterminatedToken](crate::parser::ParsingErrorType::UnterminatedToken)
/// if the input ends first.
pub fn find_next<I: ParserInput + ?Sized>(input: &I, pos: usize, target: u8) -> Result<usize> {
    find_any(input, pos, &[target]).ok_or_else(|| {
        ParsingError::unterminated_token(input, input.size(), &char::from(target).to_string())
    })
}

/// Returns the end of the run of float characters starting at `pos`.
///
/// Returns `pos` itself if no float literal starts there.
pub fn find_float<I: ParserInput + ?Sized>(input: &I, mut pos: usize) -> usize {
    while input.char_at(pos).is_some_and(is_float_char) {
        pos += 1;
    }
    pos
}

/// Consumes `expected` at `pos` and returns the position after it.
///
/// # Errors
/// * [UnexpectedCharacter](crate::parser::ParsingErrorType::UnexpectedCharacter)
///   if another byte is found
/// * [UnterminatedToken](crate::parser::ParsingErrorType::UnterminatedToken)
///   at the end of input
pub fn expect_byte<I: ParserInput + ?Sized>(input: &I, pos: usize, expected: u8) -> Result<usize> {
    if input.char_at(pos) == Some(expected) {
        Ok(pos + 1)
    } else {
        Err(ParsingError::unexpected_character(
            input,
            pos,
            &char::from(expected).to_string(),
        ))
    }
}

/// Bounded scan for any of the `targets`.
fn find_any<I: ParserInput + ?Sized>(input: &I, mut pos: usize, targets: &[u8]) -> Option<usize> {
    while let Some(c) = input.char_at(pos) {
        if targets.contains(&c) {
            return Some(pos);
        }
        pos += 1;
    }
    None
}
