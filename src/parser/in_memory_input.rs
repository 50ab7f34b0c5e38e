//! In-memory implementation of parser input.

use crate::parser::parser_input::ParserInput;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// =#========================================================================#=
// IN MEMORY INPUT
// =#========================================================================$=
/// An in-memory parser input that owns its data.
///
/// This is the typical way to parse a file: its full contents are loaded
/// into memory once and then parsed in place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInput {
    /// The owned byte data being parsed
    input: Vec<u8>,
}

impl InMemoryInput {
    /// Creates a new in-memory input from a Vec of bytes.
    ///
    /// # Arguments
    /// * `bytes` - The byte vector to parse
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { input: bytes }
    }

    /// Creates a new in-memory input by copying the given string.
    pub fn for_str(input: &str) -> Self {
        Self::from_vec(input.as_bytes().to_vec())
    }

    /// Reads the entire file at `path` into memory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<InMemoryInput> {
        let mut contents = Vec::new();
        let mut file = File::open(path)?;
        file.read_to_end(&mut contents)?;
        Ok(Self::from_vec(contents))
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.input
    }
}

impl ParserInput for InMemoryInput {
    #[inline(always)]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.input.get(offset).copied()
    }

    #[inline]
    fn size(&self) -> usize {
        self.input.len()
    }

    fn substring(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        self.input.get(start..end).map(String::from_utf8_lossy)
    }
}

impl From<String> for InMemoryInput {
    fn from(value: String) -> Self {
        Self::from_vec(value.into_bytes())
    }
}

impl From<&str> for InMemoryInput {
    fn from(value: &str) -> Self {
        Self::for_str(value)
    }
}
