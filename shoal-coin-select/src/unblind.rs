//! Opening a single confidential unspent.

use shoal_confidential::crypto::{ConfidentialCrypto, UnblindRequest};
use shoal_explorer::UnspentOutput;

use crate::error::CoinSelectError;

/// Recovers the true `(asset, value)` pair of a confidential unspent
/// using the receiver's blinding secret key.
///
/// The commitment fields arrive hex-encoded from the explorer; they are
/// decoded here, the rewind nonce is derived through the capability, and
/// the opened asset id is reversed back to display order. Fails when the
/// key is wrong, a proof is malformed or a commitment field does not
/// decode.
pub fn unblind<U: UnspentOutput, C: ConfidentialCrypto>(
    utxo: &U,
    blinding_key: &[u8],
    crypto: &C,
) -> Result<(String, u64), CoinSelectError> {
    let asset_commitment = hex::decode(utxo.asset_commitment())?;
    let value_commitment = hex::decode(utxo.value_commitment())?;

    let nonce = crypto.nonce_hash(utxo.nonce(), blinding_key)?;
    let opened = crypto.unblind_output(&UnblindRequest {
        nonce,
        range_proof: utxo.range_proof(),
        value_commitment: &value_commitment,
        asset_commitment: &asset_commitment,
        script_pubkey: utxo.script(),
    })?;

    let mut asset = opened.asset;
    asset.reverse();
    Ok((hex::encode(asset), opened.value))
}
