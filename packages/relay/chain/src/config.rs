//! Configuration for the chain backend.

use alloy::primitives::{Address, TxHash};
use rand::Rng;

/// The configuration for the chain backend.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ChainConfig {
    /// The source chain execution RPC URL.
    pub source_rpc_url: String,
    /// API keys appended to the source RPC URL; one is picked at random per
    /// run.
    #[serde(default)]
    pub source_api_keys: Vec<String>,
    /// The destination bridge node RPC URL.
    pub bridge_rpc_url: String,
    /// The relay account signer.
    pub signer: SignerConfig,
    /// The recipient of the probe transfer on the source chain.
    pub probe_recipient: Address,
    /// The value of the probe transfer, in wei.
    #[serde(default = "default_probe_value_wei")]
    pub probe_value_wei: u64,
    /// The recipient of the destination chain transfer.
    pub transfer_recipient: String,
    /// The amount transferred to the contract holder on the destination
    /// chain, in its base unit.
    #[serde(default = "default_transfer_amount")]
    pub transfer_amount: u64,
    /// Transaction hash to redeem when the queue has not fetched a receipt.
    #[serde(default)]
    pub redeem_tx_hash: Option<TxHash>,
}

impl ChainConfig {
    /// The source endpoint with one of the configured API keys appended.
    #[must_use]
    pub fn source_endpoint(&self) -> String {
        if self.source_api_keys.is_empty() {
            return self.source_rpc_url.clone();
        }
        let picked = rand::rng().random_range(0..self.source_api_keys.len());
        format!("{}{}", self.source_rpc_url, self.source_api_keys[picked])
    }
}

/// The relay account signer configuration.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SignerConfig {
    /// A raw hex-encoded secp256k1 private key.
    Hex {
        /// The hex-encoded private key, with or without a `0x` prefix.
        private_key: String,
    },
    /// An encrypted keystore file.
    Keystore {
        /// The path to the keystore file.
        path: String,
        /// The keystore password. Empty when unset.
        #[serde(default)]
        password: String,
    },
}

const fn default_probe_value_wei() -> u64 {
    1
}

const fn default_transfer_amount() -> u64 {
    9999
}
