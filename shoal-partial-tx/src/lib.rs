//! PSET-style assembly of confidential transactions.
//!
//! [`Partial`] wraps an unsigned [`Transaction`] together with per-input
//! bookkeeping and drives it through the whole pipeline: append inputs
//! and outputs, blind the outputs ([`blind`]), sign each input with the
//! digest its funding script calls for ([`sign`]) and serialize the
//! finished transaction ([`finalize`]).
#![doc = include_str!("../README.md")]

pub mod blind;
pub mod error;
pub mod finalize;
pub mod sign;

use shoal_confidential::crypto::ConfidentialCrypto;
use shoal_confidential::keypair::KeyPair;
use shoal_elements_tx::bytes;
use shoal_elements_tx::confidential::{AssetTag, Nonce, Value};
use shoal_elements_tx::sighash::SIGHASH_ALL;
use shoal_elements_tx::{OutPoint, Transaction, TxIn, TxOut, TxOutWitness};

use crate::error::PartialTxError;

/// Funding data of a transparent witness input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WitnessUtxo {
    /// Asset id, big-endian hex.
    pub asset: String,
    pub value: u64,
    /// Script locking the funding output.
    pub script: Vec<u8>,
}

/// Funding data of a confidential witness input: commitments and proofs
/// instead of plaintext asset and amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfidentialWitnessUtxo {
    pub asset_commitment: String,
    pub value_commitment: String,
    pub script: Vec<u8>,
    pub nonce: Vec<u8>,
    pub range_proof: Vec<u8>,
    pub surjection_proof: Vec<u8>,
}

/// Signature material injected into an input by the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialSignature {
    /// DER signature with the sighash-type byte appended.
    pub signature: Vec<u8>,
    pub public_key: [u8; 33],
}

/// Per-input bookkeeping kept alongside the unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialInput {
    /// The funding output being spent, transparent or confidential.
    /// Always present: non-witness spends are unsupported.
    pub witness_utxo: Option<TxOut>,
    pub sighash_type: u32,
    pub partial_sig: Option<PartialSignature>,
}

/// Assembly lifecycle of a [`Partial`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildState {
    Empty,
    Building,
    Finalized,
}

/// A partially signed confidential transaction under construction.
///
/// Inputs and outputs append monotonically while building; blinding and
/// signing mutate them in place; finalization seals the object. Every
/// mutator fails with [`PartialTxError::AlreadyFinalized`] afterwards.
///
/// Each instance is exclusively owned by the flow driving it — nothing
/// here is shared or synchronized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partial {
    /// The transaction skeleton being assembled.
    pub unsigned_tx: Transaction,
    /// Index-aligned metadata for each input of `unsigned_tx`.
    pub inputs: Vec<PartialInput>,
    state: BuildState,
}

impl Default for Partial {
    fn default() -> Self {
        Self::new()
    }
}

impl Partial {
    /// An empty version-2 skeleton with zero locktime.
    pub fn new() -> Self {
        Self {
            unsigned_tx: Transaction::new(2, 0),
            inputs: Vec::new(),
            state: BuildState::Empty,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    fn ensure_mutable(&self) -> Result<(), PartialTxError> {
        if self.state == BuildState::Finalized {
            return Err(PartialTxError::AlreadyFinalized);
        }
        Ok(())
    }

    /// Appends a transparent input. `hash` is the funding transaction id
    /// as big-endian hex and is reversed to wire order on entry. The
    /// witness funding data is mandatory; its absence fails rather than
    /// degrading to a legacy spend.
    pub fn add_input(
        &mut self,
        hash: &str,
        index: u32,
        witness_utxo: Option<WitnessUtxo>,
    ) -> Result<(), PartialTxError> {
        self.ensure_mutable()?;
        let funding = witness_utxo.ok_or(PartialTxError::UnsupportedInputType)?;
        let asset = AssetTag::from_hex(&funding.asset, false)?;
        let txout = TxOut::new(asset, Value::Explicit(funding.value), funding.script);
        self.push_input(hash, index, txout)
    }

    /// Appends a confidential input whose funding output carries
    /// commitments, a nonce and proofs. Same witness requirement as
    /// [`Partial::add_input`].
    pub fn add_blinded_input(
        &mut self,
        hash: &str,
        index: u32,
        witness_utxo: Option<ConfidentialWitnessUtxo>,
    ) -> Result<(), PartialTxError> {
        self.ensure_mutable()?;
        let funding = witness_utxo.ok_or(PartialTxError::UnsupportedInputType)?;
        let asset = AssetTag::from_commitment(&hex::decode(&funding.asset_commitment)?)?;
        let value = Value::from_commitment(&hex::decode(&funding.value_commitment)?)?;
        let mut txout = TxOut::new(asset, value, funding.script);
        txout.nonce = Nonce::from_slice(&funding.nonce)?;
        txout.witness = TxOutWitness {
            surjection_proof: funding.surjection_proof,
            range_proof: funding.range_proof,
        };
        self.push_input(hash, index, txout)
    }

    fn push_input(
        &mut self,
        hash: &str,
        index: u32,
        funding: TxOut,
    ) -> Result<(), PartialTxError> {
        let txid = bytes::hash_from_hex(hash)?;
        self.unsigned_tx
            .input
            .push(TxIn::new(OutPoint { txid, vout: index }));
        self.inputs.push(PartialInput {
            witness_utxo: Some(funding),
            sighash_type: SIGHASH_ALL,
            partial_sig: None,
        });
        self.state = BuildState::Building;
        Ok(())
    }

    /// Appends an output paying `value` of `asset` to `script`. With
    /// `blinded` set, the asset tag is only marked as awaiting blinding —
    /// the commitments themselves are produced later by
    /// [`Partial::blind_with_keys`]. An empty script denotes the fee
    /// output.
    pub fn add_output(
        &mut self,
        asset: &str,
        value: u64,
        script: Vec<u8>,
        blinded: bool,
    ) -> Result<(), PartialTxError> {
        self.ensure_mutable()?;
        let tag = AssetTag::from_hex(asset, blinded)?;
        self.unsigned_tx
            .output
            .push(TxOut::new(tag, Value::Explicit(value), script));
        self.state = BuildState::Building;
        Ok(())
    }

    /// Opens every confidential input with `input_blinding_keys` and
    /// blinds every payable output toward `output_blinding_pubkeys`.
    /// Must run after all adds and before the first signature; see
    /// [`blind::Blinder`].
    pub fn blind_with_keys<C: ConfidentialCrypto>(
        &mut self,
        input_blinding_keys: &[Vec<u8>],
        output_blinding_pubkeys: &[Vec<u8>],
        crypto: &C,
    ) -> Result<(), PartialTxError> {
        blind::Blinder::new(self, crypto).blind(input_blinding_keys, output_blinding_pubkeys)
    }

    /// Signs the input at `index` with `key_pair`; see
    /// [`sign::sign_input`].
    pub fn sign_input(&mut self, index: usize, key_pair: &KeyPair) -> Result<(), PartialTxError> {
        sign::sign_input(self, index, key_pair)
    }

    /// Validates completeness, assembles the final unlock data and
    /// returns the broadcastable wire bytes; see [`finalize::finalize`].
    pub fn finalize(&mut self) -> Result<Vec<u8>, PartialTxError> {
        finalize::finalize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_confidential::crypto::{UnblindRequest, UnblindedOutput};
    use shoal_confidential::error::ConfidentialError;
    use shoal_elements_tx::sighash::{legacy_signature_hash, segwit_v0_signature_hash};

    const ASSET: &str = "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b225";
    const FUNDING_HASH: &str = "e32b095696c00ae94b95a2f74cc6ddf23f9791381f332a64423e9187339fcb8b";
    const ALICE: &str = "bfb96a215dfb07d1a193464174b9ea8e91f2a15bba79800dea838add330f6d86";
    const BOB: &str = "1804e76aa3016013bc9969103554668913cf697c03c23aecb28136d0e0ac16f0";

    fn p2wpkh_script() -> Vec<u8> {
        let mut script = vec![0x00, 0x14];
        script.extend_from_slice(&[0x2b; 20]);
        script
    }

    fn p2sh_script() -> Vec<u8> {
        let mut script = vec![0xa9, 0x14];
        script.extend_from_slice(&[0x3c; 20]);
        script.push(0x87);
        script
    }

    fn transparent_utxo(value: u64, script: Vec<u8>) -> WitnessUtxo {
        WitnessUtxo {
            asset: ASSET.to_string(),
            value,
            script,
        }
    }

    /// Fake commitment layout the stub capability can open again:
    /// value `0x08 || amount BE || zeros`, asset `0x0a || id (wire)`.
    fn fake_commitments(asset_hex: &str, value: u64) -> (String, String) {
        let mut asset_commitment = vec![0x0a];
        let mut id = hex::decode(asset_hex).unwrap();
        id.reverse();
        asset_commitment.extend_from_slice(&id);

        let mut value_commitment = vec![0x08];
        value_commitment.extend_from_slice(&value.to_be_bytes());
        value_commitment.extend_from_slice(&[0u8; 24]);

        (hex::encode(asset_commitment), hex::encode(value_commitment))
    }

    fn confidential_utxo(value: u64, script: Vec<u8>) -> ConfidentialWitnessUtxo {
        let (asset_commitment, value_commitment) = fake_commitments(ASSET, value);
        ConfidentialWitnessUtxo {
            asset_commitment,
            value_commitment,
            script,
            nonce: vec![0x02; 33],
            range_proof: vec![0x61; 16],
            surjection_proof: vec![0x62; 8],
        }
    }

    struct StubCrypto;

    impl ConfidentialCrypto for StubCrypto {
        fn nonce_hash(
            &self,
            _nonce_commitment: &[u8],
            _blinding_key: &[u8],
        ) -> Result<[u8; 32], ConfidentialError> {
            Ok([0x11; 32])
        }

        fn unblind_output(
            &self,
            request: &UnblindRequest<'_>,
        ) -> Result<UnblindedOutput, ConfidentialError> {
            if request.value_commitment.len() != 33 || request.asset_commitment.len() != 33 {
                return Err(ConfidentialError::UnblindFailed);
            }
            let mut asset = [0u8; 32];
            asset.copy_from_slice(&request.asset_commitment[1..]);
            let mut amount = [0u8; 8];
            amount.copy_from_slice(&request.value_commitment[1..9]);
            Ok(UnblindedOutput {
                asset,
                value: u64::from_be_bytes(amount),
                asset_blinding_factor: [0u8; 32],
                value_blinding_factor: [0u8; 32],
            })
        }

        fn blind_outputs(
            &self,
            tx: &mut Transaction,
            output_indices: &[usize],
            _input_secrets: &[UnblindedOutput],
            output_blinding_pubkeys: &[Vec<u8>],
        ) -> Result<(), ConfidentialError> {
            for (slot, key) in output_indices.iter().zip(output_blinding_pubkeys) {
                let output = &mut tx.output[*slot];
                let value = output.value.explicit().ok_or_else(|| {
                    ConfidentialError::BlindingFailed("output not explicit".into())
                })?;

                let mut asset_commitment = vec![0x0a];
                asset_commitment.extend_from_slice(&output.asset.asset_id_wire());
                output.asset = AssetTag::from_commitment(&asset_commitment)
                    .map_err(|e| ConfidentialError::BlindingFailed(e.to_string()))?;

                let mut value_commitment = vec![0x08];
                value_commitment.extend_from_slice(&value.to_be_bytes());
                value_commitment.extend_from_slice(&[0u8; 24]);
                output.value = Value::from_commitment(&value_commitment)
                    .map_err(|e| ConfidentialError::BlindingFailed(e.to_string()))?;

                let mut nonce = vec![0x02];
                nonce.extend_from_slice(&key[..32.min(key.len())]);
                nonce.resize(33, 0x00);
                output.nonce = Nonce::from_slice(&nonce)
                    .map_err(|e| ConfidentialError::BlindingFailed(e.to_string()))?;

                output.witness.range_proof = vec![0x71; 32];
                output.witness.surjection_proof = vec![0x72; 16];
            }
            Ok(())
        }
    }

    mod state_machine {
        use super::*;

        #[test]
        fn starts_empty_with_a_version_2_skeleton() {
            let partial = Partial::new();
            assert_eq!(partial.state(), BuildState::Empty);
            assert_eq!(partial.unsigned_tx.version, 2);
            assert_eq!(partial.unsigned_tx.lock_time, 0);
            assert!(partial.unsigned_tx.input.is_empty());
            assert!(partial.unsigned_tx.output.is_empty());
        }

        #[test]
        fn adds_move_the_object_into_building() {
            let mut partial = Partial::new();
            partial
                .add_output(ASSET, 100, vec![0x51], false)
                .unwrap();
            assert_eq!(partial.state(), BuildState::Building);
        }

        #[test]
        fn every_mutator_fails_after_finalization() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 1_000, vec![0x51], false).unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();
            partial.finalize().unwrap();
            assert_eq!(partial.state(), BuildState::Finalized);

            assert_eq!(
                partial.add_input(FUNDING_HASH, 1, Some(transparent_utxo(1, p2wpkh_script()))),
                Err(PartialTxError::AlreadyFinalized)
            );
            assert_eq!(
                partial.add_output(ASSET, 1, vec![], false),
                Err(PartialTxError::AlreadyFinalized)
            );
            assert_eq!(
                partial.sign_input(0, &alice),
                Err(PartialTxError::AlreadyFinalized)
            );
            assert_eq!(partial.finalize(), Err(PartialTxError::AlreadyFinalized));
        }
    }

    mod add_input {
        use super::*;

        #[test]
        fn reverses_the_funding_hash_to_wire_order() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 3, Some(transparent_utxo(5_000, p2wpkh_script())))
                .unwrap();

            let outpoint = &partial.unsigned_tx.input[0].previous_output;
            assert_eq!(outpoint.vout, 3);
            assert_eq!(outpoint.txid, bytes::hash_from_hex(FUNDING_HASH).unwrap());
            // first wire byte is the last display byte
            assert_eq!(outpoint.txid[0], 0x8b);
        }

        #[test]
        fn missing_witness_data_is_unsupported() {
            let mut partial = Partial::new();
            assert_eq!(
                partial.add_input(FUNDING_HASH, 0, None),
                Err(PartialTxError::UnsupportedInputType)
            );
            assert_eq!(
                partial.add_blinded_input(FUNDING_HASH, 0, None),
                Err(PartialTxError::UnsupportedInputType)
            );
        }

        #[test]
        fn blinded_inputs_keep_commitments_and_proofs() {
            let mut partial = Partial::new();
            partial
                .add_blinded_input(FUNDING_HASH, 1, Some(confidential_utxo(9, p2wpkh_script())))
                .unwrap();

            let funding = partial.inputs[0].witness_utxo.as_ref().unwrap();
            assert!(funding.asset.is_commitment());
            assert!(funding.value.is_confidential());
            assert_eq!(funding.nonce.commitment_bytes().len(), 33);
            assert_eq!(funding.witness.range_proof, vec![0x61; 16]);
            assert_eq!(funding.witness.surjection_proof, vec![0x62; 8]);
        }

        #[test]
        fn malformed_hashes_are_rejected() {
            let mut partial = Partial::new();
            assert!(partial
                .add_input("abcd", 0, Some(transparent_utxo(1, p2wpkh_script())))
                .is_err());
        }
    }

    mod add_output {
        use super::*;

        #[test]
        fn blinded_flag_only_switches_the_tag_prefix() {
            let mut partial = Partial::new();
            partial.add_output(ASSET, 800, vec![0x51], false).unwrap();
            partial.add_output(ASSET, 200, vec![0x52], true).unwrap();

            assert!(partial.unsigned_tx.output[0].asset.is_explicit());
            assert!(partial.unsigned_tx.output[1].asset.awaits_blinding());
            // both stay explicit until the blinder runs
            assert_eq!(partial.unsigned_tx.output[1].value.explicit(), Some(200));
        }
    }

    mod signing {
        use super::*;

        #[test]
        fn native_witness_inputs_use_the_segwit_digest() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(10_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 9_500, vec![0x51], false).unwrap();
            partial.add_output(ASSET, 500, Vec::new(), false).unwrap();

            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();

            let sig = partial.inputs[0].partial_sig.as_ref().unwrap();
            assert_eq!(*sig.signature.last().unwrap(), 0x01);
            assert_eq!(sig.public_key, alice.public_key_compressed());

            // the signature verifies against the witness-v0 digest over
            // the reconstructed keyhash script
            let mut script_code = vec![0x76, 0xa9, 0x14];
            script_code.extend_from_slice(&p2wpkh_script()[2..]);
            script_code.extend_from_slice(&[0x88, 0xac]);
            let digest = segwit_v0_signature_hash(
                &partial.unsigned_tx,
                0,
                &script_code,
                &Value::Explicit(10_000),
                SIGHASH_ALL,
            )
            .unwrap();
            let der = &sig.signature[..sig.signature.len() - 1];
            assert!(alice.verify(&digest, der));

            // and not against the pre-segwit digest
            let legacy =
                legacy_signature_hash(&partial.unsigned_tx, 0, &p2wpkh_script(), SIGHASH_ALL)
                    .unwrap();
            assert!(!alice.verify(&legacy, der));
        }

        #[test]
        fn wrapped_inputs_use_the_presegwit_digest() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(10_000, p2sh_script())))
                .unwrap();
            partial.add_output(ASSET, 10_000, vec![0x51], false).unwrap();

            let bob = KeyPair::from_private_key(BOB).unwrap();
            partial.sign_input(0, &bob).unwrap();

            let sig = partial.inputs[0].partial_sig.as_ref().unwrap();
            let digest =
                legacy_signature_hash(&partial.unsigned_tx, 0, &p2sh_script(), SIGHASH_ALL)
                    .unwrap();
            assert!(bob.verify(&digest, &sig.signature[..sig.signature.len() - 1]));
        }

        #[test]
        fn unrecognized_leading_opcodes_fail_instead_of_zero_digests() {
            let mut partial = Partial::new();
            // OP_1: neither a witness program nor a script hash
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, vec![0x51])))
                .unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            assert_eq!(
                partial.sign_input(0, &alice),
                Err(PartialTxError::UnsupportedScriptType)
            );
        }

        #[test]
        fn native_programs_other_than_keyhash_are_unsupported() {
            let mut partial = Partial::new();
            let mut p2wsh = vec![0x00, 0x20];
            p2wsh.extend_from_slice(&[0x99; 32]);
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wsh)))
                .unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            assert_eq!(
                partial.sign_input(0, &alice),
                Err(PartialTxError::UnsupportedScriptType)
            );
        }

        #[test]
        fn out_of_range_indices_are_rejected() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            assert_eq!(
                partial.sign_input(1, &alice),
                Err(PartialTxError::IndexOutOfRange { index: 1, len: 1 })
            );
        }
    }

    mod blinding {
        use super::*;

        fn blinded_partial() -> Partial {
            let mut partial = Partial::new();
            partial
                .add_blinded_input(
                    FUNDING_HASH,
                    0,
                    Some(confidential_utxo(100_000_000, p2wpkh_script())),
                )
                .unwrap();
            partial
                .add_output(ASSET, 60_000_000, vec![0x51], true)
                .unwrap();
            partial
                .add_output(ASSET, 39_999_500, vec![0x52], true)
                .unwrap();
            partial.add_output(ASSET, 500, Vec::new(), false).unwrap();
            partial
        }

        fn keys() -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
            let input_keys = vec![vec![0xaa; 32]];
            let output_keys = vec![vec![0x02; 33], vec![0x03; 33]];
            (input_keys, output_keys)
        }

        #[test]
        fn blinds_every_payable_output_and_leaves_the_fee_explicit() {
            let mut partial = blinded_partial();
            let (input_keys, output_keys) = keys();
            partial
                .blind_with_keys(&input_keys, &output_keys, &StubCrypto)
                .unwrap();

            assert!(partial.unsigned_tx.output[0].value.is_confidential());
            assert!(partial.unsigned_tx.output[0].asset.is_commitment());
            assert!(!partial.unsigned_tx.output[0].witness.range_proof.is_empty());
            assert!(partial.unsigned_tx.output[1].value.is_confidential());
            // the fee output keeps its explicit form
            assert_eq!(partial.unsigned_tx.output[2].value.explicit(), Some(500));
            assert!(partial.unsigned_tx.output[2].asset.is_explicit());
        }

        #[test]
        fn input_key_count_must_match_confidential_inputs() {
            let mut partial = blinded_partial();
            let (_, output_keys) = keys();
            assert_eq!(
                partial.blind_with_keys(&[], &output_keys, &StubCrypto),
                Err(PartialTxError::BlindingKeyCount {
                    role: "input",
                    expected: 1,
                    actual: 0,
                })
            );
        }

        #[test]
        fn output_key_count_must_match_payable_outputs() {
            let mut partial = blinded_partial();
            let (input_keys, _) = keys();
            assert_eq!(
                partial.blind_with_keys(&input_keys, &[vec![0x02; 33]], &StubCrypto),
                Err(PartialTxError::BlindingKeyCount {
                    role: "output",
                    expected: 2,
                    actual: 1,
                })
            );
        }

        #[test]
        fn per_asset_imbalance_is_rejected() {
            let mut partial = Partial::new();
            partial
                .add_blinded_input(
                    FUNDING_HASH,
                    0,
                    Some(confidential_utxo(100_000_000, p2wpkh_script())),
                )
                .unwrap();
            // outputs short by 500: nothing pays the difference
            partial
                .add_output(ASSET, 99_999_500, vec![0x51], true)
                .unwrap();
            let (input_keys, _) = keys();
            assert_eq!(
                partial.blind_with_keys(&input_keys, &[vec![0x02; 33]], &StubCrypto),
                Err(PartialTxError::UnbalancedBlinding {
                    asset: ASSET.to_string(),
                })
            );
        }

        #[test]
        fn blinding_after_a_signature_is_rejected() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 1_000, vec![0x51], false).unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();

            assert_eq!(
                partial.blind_with_keys(&[], &[vec![0x02; 33]], &StubCrypto),
                Err(PartialTxError::BlindAfterSign)
            );
        }

        #[test]
        fn transparent_inputs_balance_against_explicit_outputs() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 900, vec![0x51], true).unwrap();
            partial.add_output(ASSET, 100, Vec::new(), false).unwrap();

            partial
                .blind_with_keys(&[], &[vec![0x02; 33]], &StubCrypto)
                .unwrap();
            assert!(partial.unsigned_tx.output[0].value.is_confidential());
        }
    }

    mod finalization {
        use super::*;

        #[test]
        fn produces_decodable_wire_bytes_with_final_unlock_data() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(10_000, p2wpkh_script())))
                .unwrap();
            partial
                .add_input(FUNDING_HASH, 1, Some(transparent_utxo(5_000, p2sh_script())))
                .unwrap();
            partial.add_output(ASSET, 14_500, vec![0x51], false).unwrap();
            partial.add_output(ASSET, 500, Vec::new(), false).unwrap();

            let alice = KeyPair::from_private_key(ALICE).unwrap();
            let bob = KeyPair::from_private_key(BOB).unwrap();
            partial.sign_input(0, &alice).unwrap();
            partial.sign_input(1, &bob).unwrap();

            let raw = partial.finalize().unwrap();
            let decoded = Transaction::deserialize(&raw).unwrap();

            // native input: witness [sig, pubkey], empty scriptSig
            assert!(decoded.input[0].script_sig.is_empty());
            assert_eq!(decoded.input[0].witness.script_witness.len(), 2);
            assert_eq!(
                decoded.input[0].witness.script_witness[1],
                alice.public_key_compressed().to_vec()
            );

            // wrapped input: scriptSig pushes [sig, pubkey], no witness
            assert!(decoded.input[1].witness.script_witness.is_empty());
            let script_sig = &decoded.input[1].script_sig;
            let sig_len = usize::from(script_sig[0]);
            assert_eq!(
                &script_sig[sig_len + 2..],
                bob.public_key_compressed().as_slice()
            );
        }

        #[test]
        fn unsigned_inputs_block_finalization() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial
                .add_input(FUNDING_HASH, 1, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 2_000, vec![0x51], false).unwrap();

            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();
            assert_eq!(
                partial.finalize(),
                Err(PartialTxError::IncompleteTransaction(1))
            );
        }

        #[test]
        fn outputs_still_awaiting_blinding_block_finalization() {
            let mut partial = Partial::new();
            partial
                .add_input(FUNDING_HASH, 0, Some(transparent_utxo(1_000, p2wpkh_script())))
                .unwrap();
            partial.add_output(ASSET, 1_000, vec![0x51], true).unwrap();
            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();

            assert_eq!(
                partial.finalize(),
                Err(PartialTxError::Structural("output is still awaiting blinding"))
            );
        }

        #[test]
        fn empty_transactions_fail_the_structural_check() {
            let mut partial = Partial::new();
            assert!(matches!(
                partial.finalize(),
                Err(PartialTxError::Structural(_))
            ));
        }
    }

    mod pipeline {
        use super::*;

        /// The whole confidential flow end to end: select-shaped inputs,
        /// blind, sign, finalize, decode.
        #[test]
        fn confidential_spend_assembles_and_serializes() {
            let mut partial = Partial::new();
            partial
                .add_blinded_input(
                    FUNDING_HASH,
                    0,
                    Some(confidential_utxo(100_000_000, p2wpkh_script())),
                )
                .unwrap();
            partial
                .add_output(ASSET, 50_000_000, vec![0x51], true)
                .unwrap();
            partial
                .add_output(ASSET, 49_999_500, vec![0x52], true)
                .unwrap();
            partial.add_output(ASSET, 500, Vec::new(), false).unwrap();

            let input_keys = vec![vec![0xaa; 32]];
            let output_keys = vec![vec![0x02; 33], vec![0x03; 33]];
            partial
                .blind_with_keys(&input_keys, &output_keys, &StubCrypto)
                .unwrap();

            let alice = KeyPair::from_private_key(ALICE).unwrap();
            partial.sign_input(0, &alice).unwrap();

            let raw = partial.finalize().unwrap();
            let decoded = Transaction::deserialize(&raw).unwrap();
            assert_eq!(decoded.input.len(), 1);
            assert_eq!(decoded.output.len(), 3);
            assert!(decoded.output[0].value.is_confidential());
            assert!(decoded.output[1].value.is_confidential());
            assert_eq!(decoded.output[2].value.explicit(), Some(500));
            assert_eq!(decoded.input[0].witness.script_witness.len(), 2);

            // the signature commits to the committed value of the spent output
            let sig = &decoded.input[0].witness.script_witness[0];
            let funding_value = partial.inputs[0]
                .witness_utxo
                .as_ref()
                .unwrap()
                .value;
            let mut script_code = vec![0x76, 0xa9, 0x14];
            script_code.extend_from_slice(&p2wpkh_script()[2..]);
            script_code.extend_from_slice(&[0x88, 0xac]);
            let digest = segwit_v0_signature_hash(
                &partial.unsigned_tx,
                0,
                &script_code,
                &funding_value,
                SIGHASH_ALL,
            )
            .unwrap();
            assert!(alice.verify(&digest, &sig[..sig.len() - 1]));
        }
    }
}
