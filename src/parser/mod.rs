//! Basic low-level parser input and scanning functionality.
pub mod in_memory_input;
pub mod parser_input;
pub mod parsing_error;
pub mod scan;

pub use in_memory_input::InMemoryInput;
pub use parser_input::ParserInput;
pub use parsing_error::{ParsingError, ParsingErrorType, Result};
