//! There are four blockchains: mainnet, testnet, stn, and regtest.

use serde::{Deserialize, Serialize};

/// Bitcoin has multiple blockchains: "main", "test", "regtest", and "stn" chains.
///
/// In BitcoinSV we don't call these networks but blockchains. Here they select the genesis
/// header and with it the proof-of-work limit of the chain.
#[derive(Copy, Clone, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockchainId {
    #[serde(alias = "mainnet")]
    Main = 0,
    #[serde(alias = "testnet")]
    Test = 1,
    Stn = 2,
    Regtest = 3,
}

impl BlockchainId {
    /// The compact encoding of the easiest target allowed on the blockchain.
    pub fn pow_limit_bits(&self) -> u32 {
        match self {
            BlockchainId::Regtest => 0x207fffff,
            _ => 0x1d00ffff,
        }
    }
}
