use shoal_elements_tx::error::TxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("explorer returned malformed data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Parse(err.to_string())
    }
}

impl From<hex::FromHexError> for ExplorerError {
    fn from(err: hex::FromHexError) -> Self {
        ExplorerError::Parse(err.to_string())
    }
}

impl From<TxError> for ExplorerError {
    fn from(err: TxError) -> Self {
        ExplorerError::Malformed(err.to_string())
    }
}
