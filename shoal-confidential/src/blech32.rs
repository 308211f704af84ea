//! Blech32 string codec for confidential segwit addresses.
//!
//! Same 5-bit alphabet as bech32, but with a 64-bit checksum polynomial
//! twelve characters long, sized for the 33-byte blinding key prepended
//! to the witness program.

use crate::error::ConfidentialError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const CHECKSUM_LEN: usize = 12;
const GEN: [u64; 5] = [
    0x7d52fba40bd886,
    0x5e8dbf1a03950c,
    0x1c3a3c74072a18,
    0x385d72fa0e5139,
    0x7093e5a608865b,
];
const BLECH32_CONST: u64 = 1;
const BLECH32M_CONST: u64 = 0x0455_972a_3350_f7a1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Variant {
    Blech32,
    Blech32m,
}

fn charset_rev(c: u8) -> Option<u8> {
    CHARSET.iter().position(|&x| x == c).map(|p| p as u8)
}

fn polymod<I: IntoIterator<Item = u8>>(values: I) -> u64 {
    let mut chk: u64 = 1;
    for v in values {
        let top = chk >> 55;
        chk = ((chk & 0x7f_ffff_ffff_ffff) << 5) ^ u64::from(v);
        for (i, gen) in GEN.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(hrp.len() * 2 + 1);
    for b in hrp.bytes() {
        out.push(b >> 5);
    }
    out.push(0);
    for b in hrp.bytes() {
        out.push(b & 31);
    }
    out
}

fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, ConfidentialError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let maxv: u32 = (1 << to) - 1;
    let mut out = Vec::new();
    for &b in data {
        let v = u32::from(b);
        if v >> from != 0 {
            return Err(ConfidentialError::MalformedAddress(
                "data value out of range".into(),
            ));
        }
        acc = (acc << from) | v;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(ConfidentialError::MalformedAddress(
            "invalid zero padding".into(),
        ));
    }
    Ok(out)
}

/// Decodes a blech32/blech32m string into its human-readable part,
/// witness version and 8-bit payload (blinding key plus program).
pub(crate) fn decode(addr: &str) -> Result<(String, u8, Vec<u8>), ConfidentialError> {
    let has_lower = addr.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = addr.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(ConfidentialError::MalformedAddress(
            "mixed-case string".into(),
        ));
    }
    let addr = addr.to_ascii_lowercase();

    let sep = addr
        .rfind('1')
        .ok_or_else(|| ConfidentialError::MalformedAddress("missing separator".into()))?;
    let hrp = &addr[..sep];
    let data_str = &addr[sep + 1..];
    if hrp.is_empty() || data_str.len() <= CHECKSUM_LEN {
        return Err(ConfidentialError::MalformedAddress(
            "data part too short".into(),
        ));
    }

    let mut values = Vec::with_capacity(data_str.len());
    for c in data_str.bytes() {
        values.push(charset_rev(c).ok_or_else(|| {
            ConfidentialError::MalformedAddress(format!("invalid character {:?}", char::from(c)))
        })?);
    }

    let checksum = polymod(hrp_expand(hrp).into_iter().chain(values.iter().copied()));
    let variant = match checksum {
        BLECH32_CONST => Variant::Blech32,
        BLECH32M_CONST => Variant::Blech32m,
        _ => {
            return Err(ConfidentialError::MalformedAddress(
                "checksum mismatch".into(),
            ))
        }
    };

    let version = values[0];
    if version > 16 {
        return Err(ConfidentialError::MalformedAddress(
            "witness version out of range".into(),
        ));
    }
    // same pairing rule as segwit: version 0 uses the original constant
    if (version == 0) != (variant == Variant::Blech32) {
        return Err(ConfidentialError::MalformedAddress(
            "checksum variant does not match witness version".into(),
        ));
    }

    let payload = convert_bits(&values[1..values.len() - CHECKSUM_LEN], 5, 8, false)?;
    Ok((hrp.to_string(), version, payload))
}

/// Encodes a witness version and 8-bit payload under `hrp`.
pub(crate) fn encode(
    hrp: &str,
    witness_version: u8,
    payload: &[u8],
    variant: Variant,
) -> Result<String, ConfidentialError> {
    let mut values = vec![witness_version];
    values.extend(convert_bits(payload, 8, 5, true)?);

    let constant = match variant {
        Variant::Blech32 => BLECH32_CONST,
        Variant::Blech32m => BLECH32M_CONST,
    };
    let padded = hrp_expand(hrp)
        .into_iter()
        .chain(values.iter().copied())
        .chain(std::iter::repeat(0).take(CHECKSUM_LEN));
    let pm = polymod(padded) ^ constant;

    let mut out = String::with_capacity(hrp.len() + 1 + values.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for v in &values {
        out.push(char::from(CHARSET[*v as usize]));
    }
    for i in 0..CHECKSUM_LEN {
        let idx = ((pm >> (5 * (CHECKSUM_LEN - 1 - i))) & 31) as usize;
        out.push(char::from(CHARSET[idx]));
    }
    Ok(out)
}
