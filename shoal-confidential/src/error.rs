use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfidentialError {
    #[error("commitment cannot be opened with the provided blinding key")]
    UnblindFailed,

    #[error("blinding failed: {0}")]
    BlindingFailed(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("unsupported address type")]
    UnsupportedAddressType,

    #[error("malformed address: {0}")]
    MalformedAddress(String),
}

impl From<hex::FromHexError> for ConfidentialError {
    fn from(err: hex::FromHexError) -> Self {
        ConfidentialError::InvalidHex(err.to_string())
    }
}
