//! Signature digest computation.
//!
//! Two algorithms exist, selected by the funding script's type: the
//! pre-segwit digest over a modified copy of the whole transaction, and
//! the segwit-v0 digest over cached component hashes plus the committed
//! value of the output being spent. Both cover the confidential output
//! fields, so blinding must be complete before either is computed.
//!
//! Only the all-outputs flag is ever produced by the signer; the cached
//! component hashes below assume it.

use crate::confidential::Value;
use crate::encode::{write_u32_le, write_var_slice, write_varint};
use crate::error::TxError;
use crate::{sha256d_digest, Transaction};

/// Signature-hash flag committing to every input and output.
pub const SIGHASH_ALL: u32 = 0x0000_0001;

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TxError> {
    if input_index >= tx.input.len() {
        return Err(TxError::InputIndexOutOfRange {
            index: input_index,
            len: tx.input.len(),
        });
    }
    Ok(())
}

/// Pre-segwit digest: the transaction with every input script emptied
/// except the one being signed, which carries `script_code`.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TxError> {
    check_index(tx, input_index)?;

    let mut buf = Vec::new();
    write_u32_le(&mut buf, tx.version);
    write_varint(&mut buf, tx.input.len() as u64);
    for (i, txin) in tx.input.iter().enumerate() {
        buf.extend_from_slice(&txin.previous_output.txid);
        write_u32_le(&mut buf, txin.vout_with_flags());
        if i == input_index {
            write_var_slice(&mut buf, script_code);
        } else {
            write_varint(&mut buf, 0);
        }
        write_u32_le(&mut buf, txin.sequence);
        if let Some(issuance) = &txin.asset_issuance {
            buf.extend_from_slice(&issuance.nonce);
            buf.extend_from_slice(&issuance.entropy);
            issuance.amount.encode(&mut buf);
            issuance.inflation_keys.encode(&mut buf);
        }
    }
    write_varint(&mut buf, tx.output.len() as u64);
    for txout in &tx.output {
        txout.encode_body(&mut buf);
    }
    write_u32_le(&mut buf, tx.lock_time);
    write_u32_le(&mut buf, sighash_type);

    Ok(sha256d_digest(&buf))
}

/// Segwit-v0 digest over cached prevout/sequence/issuance/output hashes,
/// the outpoint and script code of the signed input, and the committed
/// value of the output it spends (explicit 9-byte or 33-byte commitment
/// form, exactly as serialized).
pub fn segwit_v0_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: &Value,
    sighash_type: u32,
) -> Result<[u8; 32], TxError> {
    check_index(tx, input_index)?;

    let mut prevouts = Vec::new();
    let mut sequences = Vec::new();
    let mut issuances = Vec::new();
    for txin in &tx.input {
        prevouts.extend_from_slice(&txin.previous_output.txid);
        write_u32_le(&mut prevouts, txin.previous_output.vout);
        write_u32_le(&mut sequences, txin.sequence);
        match &txin.asset_issuance {
            Some(issuance) => {
                issuances.extend_from_slice(&issuance.nonce);
                issuances.extend_from_slice(&issuance.entropy);
                issuance.amount.encode(&mut issuances);
                issuance.inflation_keys.encode(&mut issuances);
            }
            None => issuances.push(0x00),
        }
    }
    let hash_prevouts = sha256d_digest(&prevouts);
    let hash_sequences = sha256d_digest(&sequences);
    let hash_issuances = sha256d_digest(&issuances);

    let mut outputs = Vec::new();
    for txout in &tx.output {
        txout.encode_body(&mut outputs);
    }
    let hash_outputs = sha256d_digest(&outputs);

    let txin = &tx.input[input_index];
    let mut buf = Vec::new();
    write_u32_le(&mut buf, tx.version);
    buf.extend_from_slice(&hash_prevouts);
    buf.extend_from_slice(&hash_sequences);
    buf.extend_from_slice(&hash_issuances);
    buf.extend_from_slice(&txin.previous_output.txid);
    write_u32_le(&mut buf, txin.previous_output.vout);
    write_var_slice(&mut buf, script_code);
    buf.extend_from_slice(&value.serialized());
    write_u32_le(&mut buf, txin.sequence);
    buf.extend_from_slice(&hash_outputs);
    write_u32_le(&mut buf, tx.lock_time);
    write_u32_le(&mut buf, sighash_type);

    Ok(sha256d_digest(&buf))
}
