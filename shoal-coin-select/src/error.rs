use shoal_confidential::error::ConfidentialError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoinSelectError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },

    #[error("{keys} blinding keys supplied for {utxos} unspents")]
    BlindingKeyCount { utxos: usize, keys: usize },

    #[error("unspent {index} is confidential but no blinding key was supplied")]
    MissingBlindingKey { index: usize },

    #[error("invalid hex in commitment field: {0}")]
    InvalidHex(String),

    #[error(transparent)]
    Unblind(#[from] ConfidentialError),
}

impl From<hex::FromHexError> for CoinSelectError {
    fn from(err: hex::FromHexError) -> Self {
        CoinSelectError::InvalidHex(err.to_string())
    }
}
