//! Network parameters for the supported confidential ledgers.

/// Address and asset parameters of one deployment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Network {
    pub name: &'static str,
    /// Human-readable part of unconfidential segwit addresses.
    pub bech32_hrp: &'static str,
    /// Human-readable part of confidential segwit addresses.
    pub blech32_hrp: &'static str,
    /// Base58 version byte of pay-to-pubkey-hash addresses.
    pub pubkey_hash: u8,
    /// Base58 version byte of pay-to-script-hash addresses.
    pub script_hash: u8,
    /// Leading version byte of confidential base58 addresses.
    pub confidential_prefix: u8,
    /// Hex id of the asset fees are paid in.
    pub policy_asset: &'static str,
}

pub const LIQUID: Network = Network {
    name: "liquid",
    bech32_hrp: "ex",
    blech32_hrp: "lq",
    pubkey_hash: 57,
    script_hash: 39,
    confidential_prefix: 12,
    policy_asset: "6f0279e9ed041c3d710a9f57d0c02928416460c4b722ae3457a11eec381c526d",
};

pub const LIQUID_TESTNET: Network = Network {
    name: "liquidtestnet",
    bech32_hrp: "tex",
    blech32_hrp: "tlq",
    pubkey_hash: 36,
    script_hash: 19,
    confidential_prefix: 23,
    policy_asset: "144c654344aa716d6f3abcc1ca90e5641e4e2a7f633bc09fe3baf64585819a49",
};

pub const ELEMENTS_REGTEST: Network = Network {
    name: "elementsregtest",
    bech32_hrp: "ert",
    blech32_hrp: "el",
    pubkey_hash: 235,
    script_hash: 75,
    confidential_prefix: 4,
    policy_asset: "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b225",
};
