//! Per-input signing.
//!
//! The digest algorithm follows the funding script: a native v0 keyhash
//! program is signed with the segwit-v0 digest over the reconstructed
//! pay-to-pubkey-hash script and the committed value, a wrapped
//! (script-hash) funding script with the pre-segwit digest over the
//! script itself. Any other leading opcode fails loudly — a digest must
//! never silently default.

use bitcoin::opcodes::all::{
    OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160, OP_PUSHBYTES_0, OP_PUSHBYTES_20,
};
use shoal_confidential::keypair::KeyPair;
use shoal_elements_tx::sighash::{legacy_signature_hash, segwit_v0_signature_hash};
use tracing::debug;

use crate::error::PartialTxError;
use crate::{Partial, PartialSignature};

/// Length of a native v0 keyhash script: `OP_0 OP_PUSHBYTES_20 <20>`.
const P2WPKH_SCRIPT_LEN: usize = 22;

pub(crate) fn p2pkh_script_code(pubkey_hash: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP.to_u8());
    script.push(OP_HASH160.to_u8());
    script.push(OP_PUSHBYTES_20.to_u8());
    script.extend_from_slice(pubkey_hash);
    script.push(OP_EQUALVERIFY.to_u8());
    script.push(OP_CHECKSIG.to_u8());
    script
}

/// Computes the digest for the input at `index`, signs it with
/// `key_pair` and injects (signature, public key) into the input's
/// partial-signature slot.
pub fn sign_input(
    partial: &mut Partial,
    index: usize,
    key_pair: &KeyPair,
) -> Result<(), PartialTxError> {
    partial.ensure_mutable()?;
    let len = partial.inputs.len();
    if index >= len {
        return Err(PartialTxError::IndexOutOfRange { index, len });
    }

    let (digest, sighash_type) = {
        let input = &partial.inputs[index];
        let funding = input
            .witness_utxo
            .as_ref()
            .ok_or(PartialTxError::UnsupportedInputType)?;
        let script = &funding.script_pubkey;

        let digest = match script.first().copied() {
            Some(op) if op == OP_PUSHBYTES_0.to_u8() => {
                // only the 20-byte keyhash program has a reconstructible
                // script code here
                if script.len() != P2WPKH_SCRIPT_LEN || script[1] != OP_PUSHBYTES_20.to_u8() {
                    return Err(PartialTxError::UnsupportedScriptType);
                }
                debug!(index, "signing via the witness-v0 digest");
                let script_code = p2pkh_script_code(&script[2..]);
                segwit_v0_signature_hash(
                    &partial.unsigned_tx,
                    index,
                    &script_code,
                    &funding.value,
                    input.sighash_type,
                )?
            }
            Some(op) if op == OP_HASH160.to_u8() => {
                debug!(index, "signing via the pre-segwit digest");
                legacy_signature_hash(&partial.unsigned_tx, index, script, input.sighash_type)?
            }
            _ => return Err(PartialTxError::UnsupportedScriptType),
        };
        (digest, input.sighash_type)
    };

    let mut signature = key_pair.sign(&digest)?;
    signature.push(sighash_type as u8);
    partial.inputs[index].partial_sig = Some(PartialSignature {
        signature,
        public_key: key_pair.public_key_compressed(),
    });
    Ok(())
}
