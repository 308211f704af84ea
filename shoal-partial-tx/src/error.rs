use shoal_confidential::error::ConfidentialError;
use shoal_elements_tx::error::TxError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PartialTxError {
    #[error("input witness data is required; non-witness inputs are not supported")]
    UnsupportedInputType,

    #[error("unsupported funding script type")]
    UnsupportedScriptType,

    #[error("input index {index} out of range ({len} inputs)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("partial transaction is already finalized")]
    AlreadyFinalized,

    #[error("blinding requires {expected} {role} keys, got {actual}")]
    BlindingKeyCount {
        role: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("input and output amounts do not balance for asset {asset}")]
    UnbalancedBlinding { asset: String },

    #[error("outputs must be blinded before any input is signed")]
    BlindAfterSign,

    #[error("input {0} is missing a signature")]
    IncompleteTransaction(usize),

    #[error("transaction failed structural checks: {0}")]
    Structural(&'static str),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error(transparent)]
    Encoding(#[from] TxError),

    #[error(transparent)]
    Crypto(#[from] ConfidentialError),
}

impl From<hex::FromHexError> for PartialTxError {
    fn from(err: hex::FromHexError) -> Self {
        PartialTxError::InvalidHex(err.to_string())
    }
}
