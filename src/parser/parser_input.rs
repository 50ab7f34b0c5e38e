//! Parser input abstraction.
//!
//! This module provides the [ParserInput] trait, the random-access view on
//! text that the Newick parser and the [scan](crate::parser::scan) helpers
//! operate on, together with implementations for the usual in-memory types.

use std::borrow::Cow;

// =#========================================================================#=
// PARSER INPUT (Trait)
// =#========================================================================T=
/// Trait defining the interface for text sources used by the Newick parser.
///
/// The parser never consumes its input; it only asks for the byte at an
/// offset, the total size, and substrings between two offsets. Offsets are
/// 0-based byte offsets.
///
/// Implemented for:
/// - `str`, `String`
/// - `[u8]`, `Vec<u8>`
/// - [InMemoryInput](crate::parser::InMemoryInput), which can also be
///   loaded from a file
///
/// Reading past the end is never undefined: [char_at](Self::char_at) and
/// [substring](Self::substring) return `None` instead, which the scanners
/// turn into explicit errors.
pub trait ParserInput {
    /// Returns the byte at `offset`, or `None` if `offset` is out of range.
    fn char_at(&self, offset: usize) -> Option<u8>;

    /// Returns the number of bytes of this input.
    fn size(&self) -> usize;

    /// Returns the text in `start..end`, or `None` if the range is out of
    /// bounds or reversed.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement
    /// character.
    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>>;
}

/// Shared implementation for all byte slices.
fn bytes_substring(bytes: &[u8], start: usize, end: usize) -> Option<Cow<'_, str>> {
    bytes.get(start..end).map(String::from_utf8_lossy)
}

impl ParserInput for [u8] {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        bytes_substring(self, start, end)
    }
}

impl ParserInput for str {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.as_bytes().get(offset).copied()
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        bytes_substring(self.as_bytes(), start, end)
    }
}

impl ParserInput for Vec<u8> {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.as_slice().char_at(offset)
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        bytes_substring(self, start, end)
    }
}

impl ParserInput for String {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.as_str().char_at(offset)
    }

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        bytes_substring(self.as_bytes(), start, end)
    }
}

impl<T: ParserInput + ?Sized> ParserInput for &T {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        (**self).char_at(offset)
    }

    #[inline]
    fn size(&self) -> usize {
        (**self).size()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        (**self).substring(start, end)
    }
}
