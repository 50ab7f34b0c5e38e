//! Error types for Newick parsing and printing.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing Newick text into a
//! [RingTree](crate::model::RingTree) or writing one back.

use crate::parser::parser_input::ParserInput;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

/// Result type of all parsing and printing operations of this crate.
pub type Result<T> = std::result::Result<T, ParsingError>;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================€=
/// Error types that can occur during Newick parsing and printing.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    /// A specific delimiter was expected but another byte was found.
    #[error("Expected {expected:?} but found {found:?}")]
    UnexpectedCharacter { expected: String, found: char },

    /// A branch length or support label could not be parsed as number.
    #[error("Malformed number {0:?}")]
    MalformedNumber(String),

    /// A scan ran into the end of input before finding its terminator.
    #[error("Unexpected end of input while looking for {expected}")]
    UnterminatedToken { expected: String },

    /// The printer found no inner vertex to start writing from.
    #[error("No printable root - {0}")]
    NoPrintableRoot(String),

    /// Reading the input failed.
    #[error("IO error - {0}")]
    IoError(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and following bytes).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and the input position.
    pub fn from_input<I: ParserInput + ?Sized>(
        kind: ParsingErrorType,
        input: &I,
        position: usize,
    ) -> Self {
        let end = position
            .saturating_add(DEFAULT_CONTEXT_LENGTH)
            .min(input.size());
        let context = input
            .substring(position, end)
            .map(|s| s.into_owned())
            .unwrap_or_default();
        Self {
            kind,
            position,
            context,
        }
    }

    /// Convenience constructor for UnexpectedCharacter.
    ///
    /// Falls back to UnterminatedToken if `position` is already past the end
    /// of the input.
    pub fn unexpected_character<I: ParserInput + ?Sized>(
        input: &I,
        position: usize,
        expected: &str,
    ) -> Self {
        match input.char_at(position) {
            Some(found) => Self::from_input(
                ParsingErrorType::UnexpectedCharacter {
                    expected: expected.to_string(),
                    found: char::from(found),
                },
                input,
                position,
            ),
            None => Self::unterminated_token(input, position, expected),
        }
    }

    /// Convenience constructor for MalformedNumber
    pub fn malformed_number<I: ParserInput + ?Sized>(
        input: &I,
        position: usize,
        text: String,
    ) -> Self {
        Self::from_input(ParsingErrorType::MalformedNumber(text), input, position)
    }

    /// Convenience constructor for UnterminatedToken
    pub fn unterminated_token<I: ParserInput + ?Sized>(
        input: &I,
        position: usize,
        expected: &str,
    ) -> Self {
        Self::from_input(
            ParsingErrorType::UnterminatedToken {
                expected: expected.to_string(),
            },
            input,
            position,
        )
    }

    /// Create a ParsingError without input context (for printer errors).
    ///
    /// For printer errors, `position` is the half-edge index at which
    /// printing failed.
    pub fn without_context(kind: ParsingErrorType, position: usize) -> Self {
        Self {
            kind,
            position,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the input following the error position (up to 50 bytes).
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError::without_context(ParsingErrorType::IoError(err.to_string()), 0)
    }
}
