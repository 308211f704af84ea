//! Wire-format data model for confidential (Elements-style) transactions.
//!
//! This crate owns the consensus encoding only: transactions, inputs,
//! outputs, the confidential asset/value/nonce field forms and the two
//! signature-digest algorithms. It performs no cryptography beyond
//! hashing; commitment arithmetic and signing live behind seams in the
//! crates built on top of it.

pub mod bytes;
pub mod confidential;
mod encode;
pub mod error;
pub mod sighash;

use bitcoin::hashes::{sha256d, Hash};

use crate::confidential::{AssetTag, Nonce, Value};
use crate::encode::{write_u32_le, write_var_slice, write_varint, Cursor};
use crate::error::TxError;

/// Flags folded into the serialized `vout` of an input.
const OUTPOINT_ISSUANCE_FLAG: u32 = 0x8000_0000;
const OUTPOINT_PEGIN_FLAG: u32 = 0x4000_0000;
const OUTPOINT_INDEX_MASK: u32 = 0x3fff_ffff;

pub(crate) fn sha256d_digest(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

/// Reference to the funding output an input spends. The txid is kept in
/// wire (little-endian) order; use [`bytes::hash_from_hex`] to build one
/// from the big-endian form explorers display.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OutPoint {
    pub txid: [u8; 32],
    pub vout: u32,
}

/// Witness data attached to an input after the transaction body.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TxInWitness {
    pub issuance_amount_rangeproof: Vec<u8>,
    pub inflation_keys_rangeproof: Vec<u8>,
    pub script_witness: Vec<Vec<u8>>,
    pub pegin_witness: Vec<Vec<u8>>,
}

impl TxInWitness {
    pub fn is_empty(&self) -> bool {
        self.issuance_amount_rangeproof.is_empty()
            && self.inflation_keys_rangeproof.is_empty()
            && self.script_witness.is_empty()
            && self.pegin_witness.is_empty()
    }
}

/// Inline issuance payload carried by an input when the issuance flag is
/// set. The builder never emits these; they are kept so transactions
/// fetched from an explorer decode and re-encode byte-identically.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AssetIssuance {
    pub nonce: [u8; 32],
    pub entropy: [u8; 32],
    pub amount: Value,
    pub inflation_keys: Value,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub is_pegin: bool,
    pub asset_issuance: Option<AssetIssuance>,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    pub witness: TxInWitness,
}

impl TxIn {
    /// A fresh input spending `previous_output` with empty unlock data
    /// and final sequence.
    pub fn new(previous_output: OutPoint) -> Self {
        Self {
            previous_output,
            is_pegin: false,
            asset_issuance: None,
            script_sig: Vec::new(),
            sequence: 0xffff_ffff,
            witness: TxInWitness::default(),
        }
    }

    pub(crate) fn vout_with_flags(&self) -> u32 {
        if self.previous_output.vout == u32::MAX {
            return u32::MAX;
        }
        let mut vout = self.previous_output.vout & OUTPOINT_INDEX_MASK;
        if self.asset_issuance.is_some() {
            vout |= OUTPOINT_ISSUANCE_FLAG;
        }
        if self.is_pegin {
            vout |= OUTPOINT_PEGIN_FLAG;
        }
        vout
    }
}

/// Proofs attached to an output after the transaction body.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TxOutWitness {
    pub surjection_proof: Vec<u8>,
    pub range_proof: Vec<u8>,
}

impl TxOutWitness {
    pub fn is_empty(&self) -> bool {
        self.surjection_proof.is_empty() && self.range_proof.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TxOut {
    pub asset: AssetTag,
    pub value: Value,
    pub nonce: Nonce,
    pub script_pubkey: Vec<u8>,
    pub witness: TxOutWitness,
}

impl TxOut {
    /// An explicit output. Fee outputs use an empty script.
    pub fn new(asset: AssetTag, value: Value, script_pubkey: Vec<u8>) -> Self {
        Self {
            asset,
            value,
            nonce: Nonce::Null,
            script_pubkey,
            witness: TxOutWitness::default(),
        }
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.asset.encode(buf);
        self.value.encode(buf);
        self.nonce.encode(buf);
        write_var_slice(buf, &self.script_pubkey);
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    pub version: u32,
    pub lock_time: u32,
    pub input: Vec<TxIn>,
    pub output: Vec<TxOut>,
}

impl Transaction {
    pub fn new(version: u32, lock_time: u32) -> Self {
        Self {
            version,
            lock_time,
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn has_witness(&self) -> bool {
        self.input.iter().any(|i| !i.witness.is_empty())
            || self.output.iter().any(|o| !o.witness.is_empty())
    }

    /// Full wire serialization, with witness data when any is present.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf, self.has_witness());
        buf
    }

    /// The transaction hash in wire order: sha256d over the
    /// witness-stripped encoding, so witness data never affects the id.
    pub fn txid(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        self.encode_into(&mut buf, false);
        sha256d_digest(&buf)
    }

    /// The transaction hash in the big-endian hex form explorers display.
    pub fn txid_hex(&self) -> String {
        bytes::hash_to_hex(&self.txid())
    }

    fn encode_into(&self, buf: &mut Vec<u8>, include_witness: bool) {
        write_u32_le(buf, self.version);
        buf.push(u8::from(include_witness));
        write_varint(buf, self.input.len() as u64);
        for txin in &self.input {
            buf.extend_from_slice(&txin.previous_output.txid);
            write_u32_le(buf, txin.vout_with_flags());
            write_var_slice(buf, &txin.script_sig);
            write_u32_le(buf, txin.sequence);
            if let Some(issuance) = &txin.asset_issuance {
                buf.extend_from_slice(&issuance.nonce);
                buf.extend_from_slice(&issuance.entropy);
                issuance.amount.encode(buf);
                issuance.inflation_keys.encode(buf);
            }
        }
        write_varint(buf, self.output.len() as u64);
        for txout in &self.output {
            txout.encode_body(buf);
        }
        write_u32_le(buf, self.lock_time);
        if include_witness {
            for txin in &self.input {
                write_var_slice(buf, &txin.witness.issuance_amount_rangeproof);
                write_var_slice(buf, &txin.witness.inflation_keys_rangeproof);
                write_varint(buf, txin.witness.script_witness.len() as u64);
                for item in &txin.witness.script_witness {
                    write_var_slice(buf, item);
                }
                write_varint(buf, txin.witness.pegin_witness.len() as u64);
                for item in &txin.witness.pegin_witness {
                    write_var_slice(buf, item);
                }
            }
            for txout in &self.output {
                write_var_slice(buf, &txout.witness.surjection_proof);
                write_var_slice(buf, &txout.witness.range_proof);
            }
        }
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, TxError> {
        let mut cur = Cursor::new(data);

        let version = cur.read_u32_le()?;
        let flag = cur.read_u8()?;
        if flag > 1 {
            return Err(TxError::InvalidPrefix {
                field: "witness flag",
                prefix: flag,
            });
        }

        let n_in = usize::try_from(cur.read_varint()?).map_err(|_| TxError::UnexpectedEof)?;
        let mut input = Vec::with_capacity(n_in.min(1024));
        for _ in 0..n_in {
            let txid = cur.read_array32()?;
            let raw_vout = cur.read_u32_le()?;
            let (vout, has_issuance, is_pegin) = if raw_vout == u32::MAX {
                (raw_vout, false, false)
            } else {
                (
                    raw_vout & OUTPOINT_INDEX_MASK,
                    raw_vout & OUTPOINT_ISSUANCE_FLAG != 0,
                    raw_vout & OUTPOINT_PEGIN_FLAG != 0,
                )
            };
            let script_sig = cur.read_var_slice()?;
            let sequence = cur.read_u32_le()?;
            let asset_issuance = if has_issuance {
                Some(AssetIssuance {
                    nonce: cur.read_array32()?,
                    entropy: cur.read_array32()?,
                    amount: Value::decode(&mut cur)?,
                    inflation_keys: Value::decode(&mut cur)?,
                })
            } else {
                None
            };
            input.push(TxIn {
                previous_output: OutPoint { txid, vout },
                is_pegin,
                asset_issuance,
                script_sig,
                sequence,
                witness: TxInWitness::default(),
            });
        }

        let n_out = usize::try_from(cur.read_varint()?).map_err(|_| TxError::UnexpectedEof)?;
        let mut output = Vec::with_capacity(n_out.min(1024));
        for _ in 0..n_out {
            let asset = AssetTag::decode(&mut cur)?;
            let value = Value::decode(&mut cur)?;
            let nonce = Nonce::decode(&mut cur)?;
            let script_pubkey = cur.read_var_slice()?;
            output.push(TxOut {
                asset,
                value,
                nonce,
                script_pubkey,
                witness: TxOutWitness::default(),
            });
        }

        let lock_time = cur.read_u32_le()?;

        if flag == 1 {
            for txin in &mut input {
                txin.witness.issuance_amount_rangeproof = cur.read_var_slice()?;
                txin.witness.inflation_keys_rangeproof = cur.read_var_slice()?;
                let items =
                    usize::try_from(cur.read_varint()?).map_err(|_| TxError::UnexpectedEof)?;
                for _ in 0..items {
                    txin.witness.script_witness.push(cur.read_var_slice()?);
                }
                let items =
                    usize::try_from(cur.read_varint()?).map_err(|_| TxError::UnexpectedEof)?;
                for _ in 0..items {
                    txin.witness.pegin_witness.push(cur.read_var_slice()?);
                }
            }
            for txout in &mut output {
                txout.witness.surjection_proof = cur.read_var_slice()?;
                txout.witness.range_proof = cur.read_var_slice()?;
            }
        }

        if !cur.is_empty() {
            return Err(TxError::TrailingBytes);
        }

        Ok(Self {
            version,
            lock_time,
            input,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: &str = "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b225";

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new(2, 0);
        tx.input.push(TxIn::new(OutPoint {
            txid: [0x11; 32],
            vout: 1,
        }));
        tx.output.push(TxOut::new(
            AssetTag::from_hex(ASSET, false).unwrap(),
            Value::Explicit(50_000_000),
            vec![0x00, 0x14, 0xaa, 0xbb],
        ));
        // fee output: empty script
        tx.output.push(TxOut::new(
            AssetTag::from_hex(ASSET, false).unwrap(),
            Value::Explicit(500),
            Vec::new(),
        ));
        tx
    }

    mod serialization {
        use super::*;

        #[test]
        fn roundtrips_without_witness() {
            let tx = sample_tx();
            let bytes = tx.serialize();
            assert_eq!(bytes[4], 0x00, "no witness data, flag must be clear");
            let decoded = Transaction::deserialize(&bytes).unwrap();
            assert_eq!(decoded, tx);
        }

        #[test]
        fn roundtrips_with_witness() {
            let mut tx = sample_tx();
            tx.input[0].witness.script_witness = vec![vec![0x30, 0x45], vec![0x02; 33]];
            tx.output[0].witness.surjection_proof = vec![0x01, 0x02];
            tx.output[0].witness.range_proof = vec![0x03; 64];
            let bytes = tx.serialize();
            assert_eq!(bytes[4], 0x01, "witness data present, flag must be set");
            let decoded = Transaction::deserialize(&bytes).unwrap();
            assert_eq!(decoded, tx);
        }

        #[test]
        fn trailing_bytes_are_rejected() {
            let mut bytes = sample_tx().serialize();
            bytes.push(0x00);
            assert_eq!(
                Transaction::deserialize(&bytes),
                Err(TxError::TrailingBytes)
            );
        }

        #[test]
        fn truncated_data_is_rejected() {
            let bytes = sample_tx().serialize();
            assert_eq!(
                Transaction::deserialize(&bytes[..bytes.len() - 3]),
                Err(TxError::UnexpectedEof)
            );
        }
    }

    mod txid {
        use super::*;

        #[test]
        fn witness_data_does_not_change_the_txid() {
            let plain = sample_tx();
            let mut signed = plain.clone();
            signed.input[0].witness.script_witness = vec![vec![0xde, 0xad], vec![0xbe, 0xef]];
            assert_eq!(plain.txid(), signed.txid());
        }

        #[test]
        fn txid_hex_is_display_order() {
            let tx = sample_tx();
            let wire = tx.txid();
            let display = tx.txid_hex();
            assert_eq!(bytes::hash_from_hex(&display).unwrap(), wire);
        }

        #[test]
        fn txid_depends_on_outputs() {
            let mut other = sample_tx();
            other.output[0].value = Value::Explicit(49_999_999);
            assert_ne!(sample_tx().txid(), other.txid());
        }
    }

    mod issuance {
        use super::*;

        #[test]
        fn inputs_with_issuance_payload_roundtrip() {
            let mut tx = sample_tx();
            tx.input[0].asset_issuance = Some(AssetIssuance {
                nonce: [0u8; 32],
                entropy: [0x42; 32],
                amount: Value::Explicit(1_000),
                inflation_keys: Value::Null,
            });
            let decoded = Transaction::deserialize(&tx.serialize()).unwrap();
            assert_eq!(decoded, tx);
        }
    }
}
