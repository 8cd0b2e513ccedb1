//! Error types for XMRG parsing.

use thiserror::Error;

/// Errors that can occur while decoding an XMRG file.
#[derive(Error, Debug)]
pub enum XmrgError {
    /// The file ended before a fixed-width read could complete.
    #[error("file truncated: needed {needed} bytes at offset {offset}")]
    Truncated { needed: usize, offset: usize },

    /// The info block's declared byte count matches no known layout.
    #[error("unknown header format: info block of {0} bytes")]
    UnknownHeaderFormat(u32),

    /// The info block's trailing record marker disagrees with its leading one.
    #[error("tail/head mismatch: info block declared {head} bytes, tail marker is {tail}")]
    TailMismatch { head: u32, tail: u32 },

    /// A row's framing marker does not match the declared row width.
    #[error("row tag mismatch on row {row}: expected {expected}, found {found}")]
    RowTagMismatch { row: usize, expected: u32, found: u32 },

    /// The primary header declared a zero-sized grid.
    #[error("invalid grid dimensions: {columns} x {rows}")]
    InvalidDimensions { columns: u32, rows: u32 },
}

/// Result type for XMRG parsing operations.
pub type Result<T> = std::result::Result<T, XmrgError>;
