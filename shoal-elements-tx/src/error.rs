use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TxError {
    #[error("unexpected end of transaction data")]
    UnexpectedEof,

    #[error("invalid {field} prefix {prefix:#04x}")]
    InvalidPrefix { field: &'static str, prefix: u8 },

    #[error("expected a {expected}-byte field, got {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },

    #[error("trailing bytes after transaction")]
    TrailingBytes,

    #[error("invalid hex string")]
    InvalidHex,

    #[error("input index {index} out of range ({len} inputs)")]
    InputIndexOutOfRange { index: usize, len: usize },
}

impl From<hex::FromHexError> for TxError {
    fn from(_: hex::FromHexError) -> Self {
        TxError::InvalidHex
    }
}
