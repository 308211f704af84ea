//! Finalization: completeness and structure checks, final unlock
//! assembly and wire serialization.

use bitcoin::opcodes::all::{OP_HASH160, OP_PUSHBYTES_0};
use shoal_elements_tx::confidential::MAX_SATOSHI;

use crate::error::PartialTxError;
use crate::{BuildState, Partial};

fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    // signatures and keys are always below the single-byte push limit
    script.push(data.len() as u8);
    script.extend_from_slice(data);
}

/// Validates the assembled transaction, writes each input's final
/// scriptSig or witness from its partial signature, marks the object
/// finalized and returns the broadcastable wire bytes.
///
/// One-shot: any failure is fatal to the current assembly, and a second
/// call fails with [`PartialTxError::AlreadyFinalized`].
pub fn finalize(partial: &mut Partial) -> Result<Vec<u8>, PartialTxError> {
    if partial.state() == BuildState::Finalized {
        return Err(PartialTxError::AlreadyFinalized);
    }
    if partial.inputs.len() != partial.unsigned_tx.input.len() {
        return Err(PartialTxError::Structural("input bookkeeping out of sync"));
    }
    if partial.unsigned_tx.input.is_empty() {
        return Err(PartialTxError::Structural("transaction has no inputs"));
    }
    if partial.unsigned_tx.output.is_empty() {
        return Err(PartialTxError::Structural("transaction has no outputs"));
    }
    for output in &partial.unsigned_tx.output {
        if output.asset.awaits_blinding() {
            return Err(PartialTxError::Structural(
                "output is still awaiting blinding",
            ));
        }
        if let Some(value) = output.value.explicit() {
            if value > MAX_SATOSHI {
                return Err(PartialTxError::Structural(
                    "output value exceeds the maximum",
                ));
            }
        }
    }
    for (index, input) in partial.inputs.iter().enumerate() {
        if input.partial_sig.is_none() {
            return Err(PartialTxError::IncompleteTransaction(index));
        }
    }

    for index in 0..partial.inputs.len() {
        let input = &partial.inputs[index];
        let funding = input
            .witness_utxo
            .as_ref()
            .ok_or(PartialTxError::UnsupportedInputType)?;
        let sig = match &input.partial_sig {
            Some(sig) => sig,
            None => return Err(PartialTxError::IncompleteTransaction(index)),
        };
        let first = funding.script_pubkey.first().copied();
        let txin = &mut partial.unsigned_tx.input[index];
        if first == Some(OP_PUSHBYTES_0.to_u8()) {
            txin.witness.script_witness =
                vec![sig.signature.clone(), sig.public_key.to_vec()];
        } else if first == Some(OP_HASH160.to_u8()) {
            let mut script_sig = Vec::with_capacity(sig.signature.len() + 36);
            push_data(&mut script_sig, &sig.signature);
            push_data(&mut script_sig, &sig.public_key);
            txin.script_sig = script_sig;
        } else {
            return Err(PartialTxError::UnsupportedScriptType);
        }
    }

    partial.state = BuildState::Finalized;
    Ok(partial.unsigned_tx.serialize())
}
