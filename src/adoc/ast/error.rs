//! Fatal parse errors

use thiserror::Error;

/// Input that cannot be turned into a document at all.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
