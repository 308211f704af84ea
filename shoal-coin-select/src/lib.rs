//! Greedy coin selection over a wallet's unspent set.
//!
//! Selection is deliberately simple: scan the unspents in their given
//! order, unblind the confidential ones on the fly, take every match
//! until the target is covered, and stop there. The order-dependent,
//! early-exit behavior is part of the contract — callers relying on it
//! (and on fixtures built around it) would be broken by a smarter
//! best-fit search, so none is attempted.

pub mod error;
pub mod unblind;

use shoal_confidential::crypto::ConfidentialCrypto;
use shoal_explorer::UnspentOutput;
use tracing::debug;

use crate::error::CoinSelectError;

/// Blinding key material accompanying an unspent set.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum BlindingKeySet {
    /// No confidential unspents expected.
    #[default]
    None,
    /// One key shared by every confidential unspent.
    Shared(Vec<u8>),
    /// One key per unspent, index-aligned with the unspent list.
    PerUtxo(Vec<Vec<u8>>),
}

impl BlindingKeySet {
    fn key_for(&self, index: usize) -> Option<&[u8]> {
        match self {
            BlindingKeySet::None => None,
            BlindingKeySet::Shared(key) => Some(key),
            BlindingKeySet::PerUtxo(keys) => keys.get(index).map(Vec::as_slice),
        }
    }
}

/// A wallet's spendable set plus the key material needed to read it.
#[derive(Clone, Debug)]
pub struct Coins<U> {
    pub utxos: Vec<U>,
    pub blinding_keys: BlindingKeySet,
}

/// Outcome of a selection: the chosen unspents in scan order plus the
/// change left over, in the requested asset.
#[derive(Debug)]
pub struct Selection<'a, U> {
    pub utxos: Vec<&'a U>,
    pub change: u64,
}

impl<U: UnspentOutput> Coins<U> {
    pub fn new(utxos: Vec<U>, blinding_keys: BlindingKeySet) -> Self {
        Self {
            utxos,
            blinding_keys,
        }
    }

    /// Selects unspents covering `amount` units of `asset`.
    ///
    /// Each unspent's true asset and amount are determined first: a
    /// confidential unspent is opened with its blinding key (per-index
    /// when a per-unspent list was supplied, shared otherwise), a
    /// transparent one is read directly. Matching unspents accumulate in
    /// scan order and the scan stops as soon as the running total covers
    /// `amount` — later unspents are never considered, even when they
    /// would fit better.
    ///
    /// An unspent that cannot be opened aborts the whole selection; a
    /// scan that ends below `amount` fails with insufficient funds. An
    /// `amount` of zero needs no inputs and returns an empty selection.
    pub fn select<C: ConfidentialCrypto>(
        &self,
        amount: u64,
        asset: &str,
        crypto: &C,
    ) -> Result<Selection<'_, U>, CoinSelectError> {
        if let BlindingKeySet::PerUtxo(keys) = &self.blinding_keys {
            if keys.len() != self.utxos.len() {
                return Err(CoinSelectError::BlindingKeyCount {
                    utxos: self.utxos.len(),
                    keys: keys.len(),
                });
            }
        }

        if amount == 0 {
            return Ok(Selection {
                utxos: Vec::new(),
                change: 0,
            });
        }

        let mut selected = Vec::new();
        let mut total: u64 = 0;
        for (index, utxo) in self.utxos.iter().enumerate() {
            let (utxo_asset, utxo_value) = if utxo.is_confidential() {
                let key = self
                    .blinding_keys
                    .key_for(index)
                    .ok_or(CoinSelectError::MissingBlindingKey { index })?;
                unblind::unblind(utxo, key, crypto)?
            } else {
                (utxo.asset().to_string(), utxo.value())
            };

            if utxo_asset == asset {
                selected.push(utxo);
                total += utxo_value;
                if total >= amount {
                    break;
                }
            }
        }

        if total < amount {
            return Err(CoinSelectError::InsufficientFunds {
                requested: amount,
                available: total,
            });
        }

        debug!(
            selected = selected.len(),
            total,
            change = total - amount,
            "coin selection complete"
        );
        Ok(Selection {
            utxos: selected,
            change: total - amount,
        })
    }
}
