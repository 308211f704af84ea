//! Confidential address handling.
//!
//! Just enough of each address format is decoded to recover the blinding
//! public key a sender needs before it can blind outputs for the
//! receiver. Nothing here derives scripts or validates payment
//! destinations.

use bitcoin::base58;

use crate::blech32;
use crate::error::ConfidentialError;
use crate::network::Network;

/// Address encodings recognized by [`address_type`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddressType {
    P2Pkh,
    P2Sh,
    Segwit,
    ConfidentialP2Pkh,
    ConfidentialP2Sh,
    ConfidentialSegwit,
}

/// Classifies an address string against `network`'s parameters.
pub fn address_type(address: &str, network: &Network) -> Result<AddressType, ConfidentialError> {
    let lower = address.to_ascii_lowercase();
    if lower.starts_with(&format!("{}1", network.blech32_hrp)) {
        return Ok(AddressType::ConfidentialSegwit);
    }
    if lower.starts_with(&format!("{}1", network.bech32_hrp)) {
        return Ok(AddressType::Segwit);
    }

    let payload = base58::decode_check(address)
        .map_err(|e| ConfidentialError::MalformedAddress(e.to_string()))?;
    let version = *payload
        .first()
        .ok_or_else(|| ConfidentialError::MalformedAddress("empty payload".into()))?;

    if version == network.confidential_prefix {
        let inner = *payload
            .get(1)
            .ok_or_else(|| ConfidentialError::MalformedAddress("truncated payload".into()))?;
        if inner == network.pubkey_hash {
            Ok(AddressType::ConfidentialP2Pkh)
        } else if inner == network.script_hash {
            Ok(AddressType::ConfidentialP2Sh)
        } else {
            Err(ConfidentialError::UnsupportedAddressType)
        }
    } else if version == network.pubkey_hash {
        Ok(AddressType::P2Pkh)
    } else if version == network.script_hash {
        Ok(AddressType::P2Sh)
    } else {
        Err(ConfidentialError::UnsupportedAddressType)
    }
}

/// Extracts the 33-byte blinding public key embedded in a confidential
/// address. Transparent addresses carry none and fail with an
/// unsupported-address error.
pub fn blinding_public_key(
    address: &str,
    network: &Network,
) -> Result<Vec<u8>, ConfidentialError> {
    match address_type(address, network)? {
        AddressType::ConfidentialP2Pkh | AddressType::ConfidentialP2Sh => {
            let payload = base58::decode_check(address)
                .map_err(|e| ConfidentialError::MalformedAddress(e.to_string()))?;
            // prefix byte + inner version byte + 33-byte key + 20-byte hash
            if payload.len() != 55 {
                return Err(ConfidentialError::MalformedAddress(format!(
                    "unexpected payload length {}",
                    payload.len()
                )));
            }
            Ok(payload[2..35].to_vec())
        }
        AddressType::ConfidentialSegwit => {
            let (hrp, _version, payload) = blech32::decode(address)?;
            if hrp != network.blech32_hrp {
                return Err(ConfidentialError::MalformedAddress(
                    "wrong network prefix".into(),
                ));
            }
            // 33-byte key followed by a 20- or 32-byte program
            if payload.len() != 53 && payload.len() != 65 {
                return Err(ConfidentialError::MalformedAddress(format!(
                    "unexpected payload length {}",
                    payload.len()
                )));
            }
            Ok(payload[..33].to_vec())
        }
        AddressType::P2Pkh | AddressType::P2Sh | AddressType::Segwit => {
            Err(ConfidentialError::UnsupportedAddressType)
        }
    }
}
