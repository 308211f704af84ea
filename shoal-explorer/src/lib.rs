//! Block-explorer access.
//!
//! Defines the capability contracts the rest of the workspace consumes —
//! the accessor set of an unspent output, fee estimation bands and the
//! explorer call surface — plus an Esplora-style HTTP implementation in
//! [`esplora`].

pub mod error;
pub mod esplora;

use serde::Deserialize;

use crate::error::ExplorerError;

/// Accessor set of one unspent output.
///
/// Transparent outputs carry an explicit `(asset, value)` pair and empty
/// commitment fields; confidential outputs carry hex commitments, a
/// nonce and proofs instead. The locking script is always present.
pub trait UnspentOutput {
    /// Funding transaction hash, big-endian hex.
    fn hash(&self) -> &str;
    fn index(&self) -> u32;
    /// Explicit amount; zero when the output is confidential.
    fn value(&self) -> u64;
    /// Explicit asset id hex; empty when the output is confidential.
    fn asset(&self) -> &str;
    fn value_commitment(&self) -> &str;
    fn asset_commitment(&self) -> &str;
    fn nonce(&self) -> &[u8];
    fn script(&self) -> &[u8];
    fn range_proof(&self) -> &[u8];
    fn surjection_proof(&self) -> &[u8];

    /// Whether the output hides its asset and amount behind commitments.
    fn is_confidential(&self) -> bool {
        !self.asset_commitment().is_empty() && !self.value_commitment().is_empty()
    }
}

/// Fee-rate bands derived from per-confirmation-target estimates.
pub trait FeeEstimation {
    fn low(&self) -> f64;
    fn medium(&self) -> f64;
    fn high(&self) -> f64;
}

/// Call contract of a block explorer. All calls block; retries and
/// timeouts are the caller's concern.
pub trait Explorer {
    type Unspent: UnspentOutput;
    type Estimation: FeeEstimation;

    /// Health probe; succeeds when the API answers.
    fn ping(&self) -> Result<(), ExplorerError>;
    fn unspents(&self, address: &str) -> Result<Vec<Self::Unspent>, ExplorerError>;
    fn transaction(&self, hash: &str) -> Result<TxDetails, ExplorerError>;
    fn transaction_hex(&self, hash: &str) -> Result<String, ExplorerError>;
    /// Submits raw transaction hex, returning the new transaction id.
    fn broadcast(&self, tx_hex: &str) -> Result<String, ExplorerError>;
    fn fee_estimates(&self) -> Result<Self::Estimation, ExplorerError>;
}

/// Transaction metadata as explorers report it.
#[derive(Clone, Debug, Deserialize)]
pub struct TxDetails {
    pub txid: String,
    pub version: i32,
    pub locktime: u32,
    pub size: usize,
    pub weight: usize,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub status: TxStatus,
    #[serde(default)]
    pub vin: Vec<TxDetailsInput>,
    #[serde(default)]
    pub vout: Vec<TxDetailsOutput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TxStatus {
    #[serde(default)]
    pub confirmed: bool,
    pub block_height: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TxDetailsInput {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub scriptsig: String,
    #[serde(default)]
    pub sequence: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TxDetailsOutput {
    #[serde(default)]
    pub scriptpubkey: String,
    #[serde(default)]
    pub scriptpubkey_type: String,
    pub scriptpubkey_address: Option<String>,
    pub value: Option<u64>,
    pub asset: Option<String>,
}
