//! The commitment-arithmetic capability.
//!
//! Opening Pedersen commitments, deriving rewind nonces and producing
//! blinded outputs with their range and surjection proofs all happen
//! behind [`ConfidentialCrypto`]. The assembly pipeline only ever talks
//! to this trait; a production wallet plugs in a zero-knowledge backend,
//! tests plug in deterministic stubs.

use shoal_elements_tx::Transaction;

use crate::error::ConfidentialError;

/// The opened form of a confidential output: what the commitment hides
/// plus the blinding factors needed to balance a spending transaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnblindedOutput {
    /// Asset identifier in wire (reversed) order.
    pub asset: [u8; 32],
    pub value: u64,
    pub asset_blinding_factor: [u8; 32],
    pub value_blinding_factor: [u8; 32],
}

/// Everything needed to open one committed output.
#[derive(Clone, Copy, Debug)]
pub struct UnblindRequest<'a> {
    /// Rewind nonce, already derived via [`ConfidentialCrypto::nonce_hash`].
    pub nonce: [u8; 32],
    pub range_proof: &'a [u8],
    pub value_commitment: &'a [u8],
    pub asset_commitment: &'a [u8],
    pub script_pubkey: &'a [u8],
}

pub trait ConfidentialCrypto {
    /// Derives the shared rewind nonce from an output's ephemeral nonce
    /// commitment and the receiver's blinding secret key.
    fn nonce_hash(
        &self,
        nonce_commitment: &[u8],
        blinding_key: &[u8],
    ) -> Result<[u8; 32], ConfidentialError>;

    /// Opens a committed output, recovering its asset, amount and
    /// blinding factors. Fails with an unblind error when the nonce does
    /// not rewind the range proof (wrong key) or the proof is malformed.
    fn unblind_output(
        &self,
        request: &UnblindRequest<'_>,
    ) -> Result<UnblindedOutput, ConfidentialError>;

    /// Blinds the outputs at `output_indices` in place: replaces their
    /// explicit asset and value with commitments balanced against
    /// `input_secrets`, sets the ephemeral nonce for each recipient key
    /// and attaches range and surjection proofs.
    fn blind_outputs(
        &self,
        tx: &mut Transaction,
        output_indices: &[usize],
        input_secrets: &[UnblindedOutput],
        output_blinding_pubkeys: &[Vec<u8>],
    ) -> Result<(), ConfidentialError>;
}
