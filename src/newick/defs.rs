//! Constants and definitions for the Newick parser and writer.

/// Default guess for number of tips, when unknown
pub(crate) const DEFAULT_NUM_TIPS_GUESS: usize = 10;

/// Default number of fraction digits written for branch lengths
pub const DEFAULT_LENGTH_PRECISION: usize = 20;

/// Fewest significant digits a fixed-precision branch length is written with
pub const MIN_SIGNIFICANT_DIGITS: usize = 8;

/// Extra buffer in Newick string length/capacity estimate
pub(crate) const BUFFER_CHARS: usize = 10;
