//! Esplora-style HTTP client.
//!
//! A thin blocking shim over the REST surface. The one piece of real
//! work lives in [`EsploraClient::unspents`]: the utxo listing endpoint
//! does not return locking scripts, nonces or proofs, so each unspent is
//! hydrated by fetching and decoding its funding transaction — the
//! unblinder downstream cannot open a commitment without them.

use std::collections::HashMap;

use serde::Deserialize;
use shoal_elements_tx::Transaction;
use tracing::{debug, warn};

use crate::error::ExplorerError;
use crate::{Explorer, FeeEstimation, TxDetails, UnspentOutput};

/// Client for one Esplora deployment. The base URL is per-instance
/// configuration; no process-wide state is involved.
#[derive(Clone, Debug)]
pub struct EsploraClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl EsploraClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str) -> Result<String, ExplorerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "explorer GET");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "explorer request failed");
            return Err(ExplorerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn post(&self, path: &str, payload: String) -> Result<String, ExplorerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "explorer POST");
        let response = self.http.post(&url).body(payload).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "explorer request failed");
            return Err(ExplorerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// One unspent output, hydrated with the script, nonce and proofs from
/// its funding transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    hash: String,
    index: u32,
    value: u64,
    asset: String,
    value_commitment: String,
    asset_commitment: String,
    nonce: Vec<u8>,
    script: Vec<u8>,
    range_proof: Vec<u8>,
    surjection_proof: Vec<u8>,
}

impl UnspentOutput for Utxo {
    fn hash(&self) -> &str {
        &self.hash
    }
    fn index(&self) -> u32 {
        self.index
    }
    fn value(&self) -> u64 {
        self.value
    }
    fn asset(&self) -> &str {
        &self.asset
    }
    fn value_commitment(&self) -> &str {
        &self.value_commitment
    }
    fn asset_commitment(&self) -> &str {
        &self.asset_commitment
    }
    fn nonce(&self) -> &[u8] {
        &self.nonce
    }
    fn script(&self) -> &[u8] {
        &self.script
    }
    fn range_proof(&self) -> &[u8] {
        &self.range_proof
    }
    fn surjection_proof(&self) -> &[u8] {
        &self.surjection_proof
    }
}

#[derive(Debug, Deserialize)]
struct RawUtxo {
    txid: String,
    vout: u32,
    value: Option<u64>,
    asset: Option<String>,
    valuecommitment: Option<String>,
    assetcommitment: Option<String>,
}

/// Raw confirmation-target to sat/vB estimates as the API returns them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct FeeEstimates {
    targets: HashMap<String, f64>,
}

impl FeeEstimates {
    fn target(&self, blocks: &str) -> f64 {
        self.targets.get(blocks).copied().unwrap_or_default()
    }
}

impl FeeEstimation for FeeEstimates {
    /// Average of the long-horizon buckets.
    fn low(&self) -> f64 {
        (self.target("10")
            + self.target("20")
            + self.target("144")
            + self.target("504")
            + self.target("1008"))
            / 5.0
    }

    /// Average of the next-few-blocks buckets.
    fn medium(&self) -> f64 {
        (self.target("3") + self.target("4") + self.target("6")) / 3.0
    }

    /// The two-block estimate.
    fn high(&self) -> f64 {
        self.target("2")
    }
}

impl Explorer for EsploraClient {
    type Unspent = Utxo;
    type Estimation = FeeEstimates;

    fn ping(&self) -> Result<(), ExplorerError> {
        self.get("/blocks/tip/height").map(|_| ())
    }

    fn unspents(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError> {
        let body = self.get(&format!("/address/{address}/utxo"))?;
        let raw: Vec<RawUtxo> = serde_json::from_str(&body)?;

        let mut cache: HashMap<String, Transaction> = HashMap::new();
        let mut unspents = Vec::with_capacity(raw.len());
        for entry in raw {
            if !cache.contains_key(&entry.txid) {
                let tx_hex = self.transaction_hex(&entry.txid)?;
                let tx = Transaction::deserialize(&hex::decode(tx_hex.trim())?)?;
                cache.insert(entry.txid.clone(), tx);
            }
            let funding = &cache[&entry.txid];
            let output = funding.output.get(entry.vout as usize).ok_or_else(|| {
                ExplorerError::Malformed(format!(
                    "transaction {} has no output {}",
                    entry.txid, entry.vout
                ))
            })?;

            unspents.push(Utxo {
                index: entry.vout,
                value: entry.value.unwrap_or_default(),
                asset: entry.asset.unwrap_or_default(),
                value_commitment: entry.valuecommitment.unwrap_or_default(),
                asset_commitment: entry.assetcommitment.unwrap_or_default(),
                nonce: output.nonce.commitment_bytes().to_vec(),
                script: output.script_pubkey.clone(),
                range_proof: output.witness.range_proof.clone(),
                surjection_proof: output.witness.surjection_proof.clone(),
                hash: entry.txid,
            });
        }
        Ok(unspents)
    }

    fn transaction(&self, hash: &str) -> Result<TxDetails, ExplorerError> {
        let body = self.get(&format!("/tx/{hash}"))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn transaction_hex(&self, hash: &str) -> Result<String, ExplorerError> {
        Ok(self.get(&format!("/tx/{hash}/hex"))?.trim().to_string())
    }

    fn broadcast(&self, tx_hex: &str) -> Result<String, ExplorerError> {
        Ok(self.post("/tx", tx_hex.to_string())?.trim().to_string())
    }

    fn fee_estimates(&self) -> Result<FeeEstimates, ExplorerError> {
        let body = self.get("/fee-estimates")?;
        Ok(serde_json::from_str(&body)?)
    }
}
