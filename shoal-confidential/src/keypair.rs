//! Secp256k1 key pairs.
//!
//! The same type backs both roles a wallet needs: signing keys, which
//! authorize spends, and blinding keys, which hide and reveal committed
//! amounts. The two are distinct key pairs over the same curve and must
//! never be conflated; callers keep separate instances per role.

use libsecp256k1::{Message, PublicKey, SecretKey, Signature};

use crate::error::ConfidentialError;

#[derive(Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

impl KeyPair {
    /// Loads a key pair from a hex-encoded 32-byte secret key.
    pub fn from_private_key(hex_priv: &str) -> Result<Self, ConfidentialError> {
        let bytes = hex::decode(hex_priv)?;
        let secret_key = SecretKey::parse_slice(&bytes)
            .map_err(|_| ConfidentialError::InvalidSecretKey)?;
        let public_key = PublicKey::from_secret_key(&secret_key);
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// The 33-byte compressed public key.
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.public_key.serialize_compressed()
    }

    /// The raw 32-byte secret key. Blinding flows hand this to the
    /// commitment capability.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret_key.serialize()
    }

    /// ECDSA-signs a 32-byte digest, returning the DER-encoded signature.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, ConfidentialError> {
        let message = Message::parse(digest);
        let (signature, _) = libsecp256k1::sign(&message, &self.secret_key);
        Ok(signature.serialize_der().as_ref().to_vec())
    }

    /// Verifies a DER-encoded signature over `digest` against this pair's
    /// public key.
    pub fn verify(&self, digest: &[u8; 32], der_sig: &[u8]) -> bool {
        let message = Message::parse(digest);
        match Signature::parse_der(der_sig) {
            Ok(signature) => libsecp256k1::verify(&message, &signature, &self.public_key),
            Err(_) => false,
        }
    }
}
