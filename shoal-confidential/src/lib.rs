//! Key material and cryptographic seams for confidential transaction
//! assembly.
//!
//! Three concerns live here: secp256k1 key pairs (signing and blinding
//! roles), the [`crypto::ConfidentialCrypto`] capability behind which all
//! commitment arithmetic happens, and address utilities that recover the
//! blinding public key embedded in confidential addresses.

pub mod address;
mod blech32;
pub mod crypto;
pub mod error;
pub mod keypair;
pub mod network;
