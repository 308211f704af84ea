//! Confidential asset, value and nonce field encodings.
//!
//! Every output field exists in an explicit form and a committed form, told
//! apart by a one-byte prefix. An asset tag additionally has a third,
//! in-memory-only form (prefix `0x00`) marking an output whose commitment
//! has not been produced yet; that form never appears on the wire.

use crate::bytes::reverse;
use crate::encode::Cursor;
use crate::error::TxError;

/// Upper bound for an explicit amount, in the smallest unit.
pub const MAX_SATOSHI: u64 = 21_000_000 * 100_000_000;

/// A 33-byte asset field: one prefix byte followed by either the 32-byte
/// asset identifier in wire (reversed) order or an asset commitment.
///
/// Prefix `0x01` marks an explicit asset, `0x00` an output still awaiting
/// blinding, and `0x0a`/`0x0b` a commitment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AssetTag([u8; 33]);

impl AssetTag {
    /// Builds a tag from a big-endian asset id hex string, reversing it to
    /// wire order. With `blinded` set, the tag is marked as awaiting
    /// blinding instead of explicit; the commitment itself is produced
    /// later by the blinding step.
    pub fn from_hex(asset: &str, blinded: bool) -> Result<Self, TxError> {
        let id = hex::decode(asset)?;
        if id.len() != 32 {
            return Err(TxError::InvalidLength {
                expected: 32,
                actual: id.len(),
            });
        }
        let mut tag = [0u8; 33];
        tag[0] = if blinded { 0x00 } else { 0x01 };
        for (slot, byte) in tag[1..].iter_mut().zip(id.iter().rev()) {
            *slot = *byte;
        }
        Ok(Self(tag))
    }

    /// Wraps a 33-byte asset commitment produced by a blinding step.
    pub fn from_commitment(bytes: &[u8]) -> Result<Self, TxError> {
        if bytes.len() != 33 {
            return Err(TxError::InvalidLength {
                expected: 33,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x0a && bytes[0] != 0x0b {
            return Err(TxError::InvalidPrefix {
                field: "asset",
                prefix: bytes[0],
            });
        }
        let mut tag = [0u8; 33];
        tag.copy_from_slice(bytes);
        Ok(Self(tag))
    }

    /// The asset identifier back in display (big-endian hex) order. Only
    /// meaningful for explicit or awaiting-blinding tags.
    pub fn asset_id_hex(&self) -> String {
        hex::encode(reverse(&self.0[1..]))
    }

    /// The asset identifier in wire order. Only meaningful for explicit or
    /// awaiting-blinding tags.
    pub fn asset_id_wire(&self) -> [u8; 32] {
        let mut id = [0u8; 32];
        id.copy_from_slice(&self.0[1..]);
        id
    }

    pub fn is_explicit(&self) -> bool {
        self.0[0] == 0x01
    }

    pub fn is_commitment(&self) -> bool {
        matches!(self.0[0], 0x0a | 0x0b)
    }

    pub fn awaits_blinding(&self) -> bool {
        self.0[0] == 0x00
    }

    pub fn prefix(&self) -> u8 {
        self.0[0]
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }

    pub(crate) fn decode(cur: &mut Cursor<'_>) -> Result<Self, TxError> {
        let prefix = cur.read_u8()?;
        match prefix {
            0x01 | 0x0a | 0x0b => {
                let mut tag = [0u8; 33];
                tag[0] = prefix;
                tag[1..].copy_from_slice(cur.read_slice(32)?);
                Ok(Self(tag))
            }
            _ => Err(TxError::InvalidPrefix {
                field: "asset",
                prefix,
            }),
        }
    }
}

/// A confidential amount: absent, explicit satoshis (prefix `0x01`,
/// big-endian) or a 33-byte value commitment (prefix `0x08`/`0x09`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Value {
    /// No amount at all; only valid inside issuance payloads.
    Null,
    Explicit(u64),
    Commitment([u8; 33]),
}

impl Value {
    /// Wraps a 33-byte value commitment produced by a blinding step.
    pub fn from_commitment(bytes: &[u8]) -> Result<Self, TxError> {
        if bytes.len() != 33 {
            return Err(TxError::InvalidLength {
                expected: 33,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x08 && bytes[0] != 0x09 {
            return Err(TxError::InvalidPrefix {
                field: "value",
                prefix: bytes[0],
            });
        }
        let mut c = [0u8; 33];
        c.copy_from_slice(bytes);
        Ok(Self::Commitment(c))
    }

    pub fn explicit(&self) -> Option<u64> {
        match self {
            Value::Explicit(v) => Some(*v),
            Value::Null | Value::Commitment(_) => None,
        }
    }

    pub fn is_confidential(&self) -> bool {
        matches!(self, Value::Commitment(_))
    }

    /// Wire encoding: one byte for null, 9 bytes explicit, 33 committed.
    pub fn serialized(&self) -> Vec<u8> {
        match self {
            Value::Null => vec![0x00],
            Value::Explicit(v) => {
                let mut out = Vec::with_capacity(9);
                out.push(0x01);
                out.extend_from_slice(&v.to_be_bytes());
                out
            }
            Value::Commitment(c) => c.to_vec(),
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.serialized());
    }

    pub(crate) fn decode(cur: &mut Cursor<'_>) -> Result<Self, TxError> {
        let prefix = cur.read_u8()?;
        match prefix {
            0x00 => Ok(Value::Null),
            0x01 => {
                let b = cur.read_slice(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(b);
                Ok(Value::Explicit(u64::from_be_bytes(raw)))
            }
            0x08 | 0x09 => {
                let mut c = [0u8; 33];
                c[0] = prefix;
                c[1..].copy_from_slice(cur.read_slice(32)?);
                Ok(Value::Commitment(c))
            }
            _ => Err(TxError::InvalidPrefix {
                field: "value",
                prefix,
            }),
        }
    }
}

/// An output nonce: absent, or the 33-byte ephemeral public key the
/// receiver combines with its blinding key to rewind the range proof.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Nonce {
    #[default]
    Null,
    Commitment([u8; 33]),
}

impl Nonce {
    /// Accepts the raw bytes an explorer hands back: empty for an
    /// unblinded output, 33 bytes for a committed one.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TxError> {
        if bytes.is_empty() {
            return Ok(Nonce::Null);
        }
        if bytes.len() != 33 {
            return Err(TxError::InvalidLength {
                expected: 33,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(TxError::InvalidPrefix {
                field: "nonce",
                prefix: bytes[0],
            });
        }
        let mut c = [0u8; 33];
        c.copy_from_slice(bytes);
        Ok(Nonce::Commitment(c))
    }

    /// The committed bytes, empty when null.
    pub fn commitment_bytes(&self) -> &[u8] {
        match self {
            Nonce::Null => &[],
            Nonce::Commitment(c) => &c[..],
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Nonce::Null => buf.push(0x00),
            Nonce::Commitment(c) => buf.extend_from_slice(&c[..]),
        }
    }

    pub(crate) fn decode(cur: &mut Cursor<'_>) -> Result<Self, TxError> {
        let prefix = cur.read_u8()?;
        match prefix {
            0x00 => Ok(Nonce::Null),
            0x02 | 0x03 => {
                let mut c = [0u8; 33];
                c[0] = prefix;
                c[1..].copy_from_slice(cur.read_slice(32)?);
                Ok(Nonce::Commitment(c))
            }
            _ => Err(TxError::InvalidPrefix {
                field: "nonce",
                prefix,
            }),
        }
    }
}
