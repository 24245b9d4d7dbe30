//! Defines the [`ChainApi`] trait that the sequencer drives.

use anyhow::Result;
use serde_json::Value;

/// The `ChainApi` trait defines one operation per step kind.
///
/// Operations take no arguments: endpoints, accounts and amounts are bound
/// at construction. `Ok(payload)` is a completed step — the payload, when
/// present, surfaces in the completion report — and `Err` is a failed step.
///
/// # Errors
/// Every operation returns an error when the underlying chain interaction
/// fails; the sequencer records it as the step's failure.
#[async_trait::async_trait]
pub trait ChainApi: Send + Sync + 'static {
    /// Submit the probe transaction to the source chain.
    async fn send_tx(&self) -> Result<Option<Value>>;

    /// Fetch the receipt of the previously submitted probe transaction.
    async fn get_receipt(&self) -> Result<Option<Value>>;

    /// Fetch the header of the block containing the receipt.
    async fn get_container_header(&self) -> Result<Option<Value>>;

    /// Fetch the source chain genesis header.
    async fn get_genesis_header(&self) -> Result<Option<Value>>;

    /// Query the relay account balance on the destination chain.
    async fn get_balance(&self) -> Result<Option<Value>>;

    /// Reset the genesis header on the destination chain.
    async fn reset(&self) -> Result<Option<Value>>;

    /// Relay a header to the destination chain.
    async fn relay(&self) -> Result<Option<Value>>;

    /// Redeem a receipt on the destination chain.
    async fn redeem(&self) -> Result<Option<Value>>;

    /// Transfer funds to the contract holder on the destination chain.
    async fn transfer(&self) -> Result<Option<Value>>;
}
