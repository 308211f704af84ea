//! Byte-order helpers.
//!
//! Transaction hashes and asset identifiers are displayed big-endian but
//! live little-endian on the wire; every boundary crossing goes through
//! these helpers so the reversal happens in exactly one place.

use crate::error::TxError;

/// Returns a reversed copy of `bytes`.
pub fn reverse(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out.reverse();
    out
}

/// Parses a big-endian hex hash (the form explorers display) into wire
/// byte order.
pub fn hash_from_hex(hash: &str) -> Result<[u8; 32], TxError> {
    let bytes = hex::decode(hash)?;
    let mut out: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| TxError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
    out.reverse();
    Ok(out)
}

/// Renders a wire-order hash as the big-endian hex string explorers display.
pub fn hash_to_hex(wire: &[u8; 32]) -> String {
    hex::encode(reverse(wire))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_hex_roundtrips_through_wire_order() {
        let display = "e32b095696c00ae94b95a2f74cc6ddf23f9791381f332a64423e9187339fcb8b";
        let wire = hash_from_hex(display).unwrap();
        assert_eq!(wire[0], 0x8b);
        assert_eq!(wire[31], 0xe3);
        assert_eq!(hash_to_hex(&wire), display);
    }

    #[test]
    fn rejects_wrong_length_and_bad_hex() {
        assert_eq!(
            hash_from_hex("abcd"),
            Err(TxError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
        assert_eq!(hash_from_hex("zz"), Err(TxError::InvalidHex));
    }
}
