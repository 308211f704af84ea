//! Output blinding orchestration.
//!
//! The blinder validates key counts and per-asset balance, opens every
//! confidential input, and hands the actual commitment arithmetic to the
//! capability. It must run after all inputs and outputs have been added
//! and before any signature: signatures commit to the output
//! commitments the capability writes.

use std::collections::BTreeMap;

use shoal_confidential::crypto::{ConfidentialCrypto, UnblindRequest, UnblindedOutput};
use tracing::debug;

use crate::error::PartialTxError;
use crate::Partial;

pub struct Blinder<'a, C> {
    partial: &'a mut Partial,
    crypto: &'a C,
}

impl<'a, C: ConfidentialCrypto> Blinder<'a, C> {
    pub fn new(partial: &'a mut Partial, crypto: &'a C) -> Self {
        Self { partial, crypto }
    }

    /// Blinds the partial transaction in place.
    ///
    /// `input_blinding_keys` holds one secret key per confidential
    /// input, in input order. `output_blinding_pubkeys` holds one public
    /// key per payable output, in output order; fee outputs (empty
    /// script) stay explicit and take no key. Key-count mismatches and
    /// per-asset value imbalance fail before the capability runs.
    pub fn blind(
        self,
        input_blinding_keys: &[Vec<u8>],
        output_blinding_pubkeys: &[Vec<u8>],
    ) -> Result<(), PartialTxError> {
        self.partial.ensure_mutable()?;
        if self.partial.unsigned_tx.input.is_empty() || self.partial.unsigned_tx.output.is_empty()
        {
            return Err(PartialTxError::Structural(
                "cannot blind an empty transaction",
            ));
        }
        if self.partial.inputs.iter().any(|i| i.partial_sig.is_some()) {
            return Err(PartialTxError::BlindAfterSign);
        }

        let confidential_inputs = self
            .partial
            .inputs
            .iter()
            .filter(|input| {
                input.witness_utxo.as_ref().is_some_and(|funding| {
                    funding.asset.is_commitment() || funding.value.is_confidential()
                })
            })
            .count();
        if confidential_inputs != input_blinding_keys.len() {
            return Err(PartialTxError::BlindingKeyCount {
                role: "input",
                expected: confidential_inputs,
                actual: input_blinding_keys.len(),
            });
        }

        let payable: Vec<usize> = self
            .partial
            .unsigned_tx
            .output
            .iter()
            .enumerate()
            .filter(|(_, output)| !output.script_pubkey.is_empty())
            .map(|(index, _)| index)
            .collect();
        if payable.len() != output_blinding_pubkeys.len() {
            return Err(PartialTxError::BlindingKeyCount {
                role: "output",
                expected: payable.len(),
                actual: output_blinding_pubkeys.len(),
            });
        }

        // open the confidential inputs and tally per-asset amounts
        let mut input_secrets: Vec<UnblindedOutput> = Vec::with_capacity(confidential_inputs);
        let mut balance: BTreeMap<[u8; 32], i128> = BTreeMap::new();
        for input in &self.partial.inputs {
            let funding = input
                .witness_utxo
                .as_ref()
                .ok_or(PartialTxError::UnsupportedInputType)?;
            if funding.asset.is_commitment() || funding.value.is_confidential() {
                let key = &input_blinding_keys[input_secrets.len()];
                let nonce = self
                    .crypto
                    .nonce_hash(funding.nonce.commitment_bytes(), key)?;
                let value_bytes = funding.value.serialized();
                let secret = self.crypto.unblind_output(&UnblindRequest {
                    nonce,
                    range_proof: &funding.witness.range_proof,
                    value_commitment: &value_bytes,
                    asset_commitment: &funding.asset.as_bytes()[..],
                    script_pubkey: &funding.script_pubkey,
                })?;
                *balance.entry(secret.asset).or_insert(0) += i128::from(secret.value);
                input_secrets.push(secret);
            } else {
                let value = funding.value.explicit().ok_or(PartialTxError::Structural(
                    "transparent input without an explicit value",
                ))?;
                *balance.entry(funding.asset.asset_id_wire()).or_insert(0) += i128::from(value);
            }
        }

        for output in &self.partial.unsigned_tx.output {
            if output.asset.is_commitment() || output.value.is_confidential() {
                return Err(PartialTxError::Structural("output is already blinded"));
            }
            let value = output.value.explicit().ok_or(PartialTxError::Structural(
                "output without an explicit value",
            ))?;
            *balance.entry(output.asset.asset_id_wire()).or_insert(0) -= i128::from(value);
        }

        for (asset_wire, delta) in &balance {
            if *delta != 0 {
                let mut display = *asset_wire;
                display.reverse();
                return Err(PartialTxError::UnbalancedBlinding {
                    asset: hex::encode(display),
                });
            }
        }

        debug!(
            inputs = input_secrets.len(),
            outputs = payable.len(),
            "blinding outputs"
        );
        self.crypto.blind_outputs(
            &mut self.partial.unsigned_tx,
            &payable,
            &input_secrets,
            output_blinding_pubkeys,
        )?;
        Ok(())
    }
}
