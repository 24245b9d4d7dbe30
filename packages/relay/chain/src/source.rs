//! Source chain client: submits the probe transaction and fetches receipts
//! and headers over the execution JSON-RPC API.

use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Block, TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use anyhow::Result;
use futures_timer::Delay;
use tracing::debug;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const RECEIPT_POLL_ATTEMPTS: u32 = 40;

/// Wallet-backed client for the source chain.
pub struct SourceClient {
    provider: DynProvider,
    recipient: Address,
    probe_value: U256,
}

impl SourceClient {
    /// Connect to the source chain endpoint with the given relay account.
    ///
    /// # Errors
    /// Returns an error if the provider cannot be created for the endpoint.
    pub async fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        recipient: Address,
        probe_value: U256,
    ) -> Result<Self> {
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(rpc_url)
            .await
            .map_err(|e| anyhow::anyhow!("failed to create provider: {e}"))?
            .erased();

        Ok(Self {
            provider,
            recipient,
            probe_value,
        })
    }

    /// Submit the probe transfer and wait for it to be included.
    ///
    /// # Errors
    /// Returns an error if submission or inclusion watching fails.
    pub async fn send_probe_tx(&self) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_to(self.recipient)
            .with_value(self.probe_value);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = pending.watch().await?;
        debug!(%tx_hash, "probe transaction included");
        Ok(tx_hash)
    }

    /// Poll for the receipt of the given transaction until it is available.
    ///
    /// # Errors
    /// Returns an error if the receipt does not appear within the bounded
    /// number of attempts, or a poll itself fails.
    pub async fn receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            debug!(%tx_hash, "receipt not available yet, retrying");
            Delay::new(RECEIPT_POLL_INTERVAL).await;
        }
        anyhow::bail!("no receipt for {tx_hash} after {RECEIPT_POLL_ATTEMPTS} attempts")
    }

    /// Fetch the header of the block with the given hash.
    ///
    /// # Errors
    /// Returns an error if the block is unknown or the fetch fails.
    pub async fn header_by_hash(&self, hash: B256) -> Result<Block> {
        self.provider
            .get_block_by_hash(hash)
            .await?
            .ok_or_else(|| anyhow::anyhow!("block {hash} not found on the source chain"))
    }

    /// Fetch the source chain genesis header.
    ///
    /// # Errors
    /// Returns an error if the fetch fails.
    pub async fn genesis_header(&self) -> Result<Block> {
        self.header_by_number(BlockNumberOrTag::Earliest).await
    }

    /// Fetch the latest source chain header.
    ///
    /// # Errors
    /// Returns an error if the fetch fails.
    pub async fn latest_header(&self) -> Result<Block> {
        self.header_by_number(BlockNumberOrTag::Latest).await
    }

    async fn header_by_number(&self, number: BlockNumberOrTag) -> Result<Block> {
        self.provider
            .get_block_by_number(number)
            .await?
            .ok_or_else(|| anyhow::anyhow!("block {number} not found on the source chain"))
    }
}
