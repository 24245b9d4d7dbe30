//! Strategy expansion: maps a requested strategy and the `dynamic` flag into
//! the ordered list of relay steps.

use std::fmt;
use std::str::FromStr;

/// One atomic relay operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Submit the probe transaction to the source chain.
    SendTx,
    /// Fetch the receipt of the probe transaction.
    GetReceipt,
    /// Fetch the header of the block containing the receipt.
    GetContainerHeader,
    /// Fetch the source chain genesis header.
    GetGenesisHeader,
    /// Query the relay account balance on the destination chain.
    GetBalance,
    /// Reset the genesis header on the destination chain.
    Reset,
    /// Relay a header to the destination chain.
    Relay,
    /// Redeem a receipt on the destination chain.
    Redeem,
    /// Transfer funds to the contract holder on the destination chain.
    Transfer,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SendTx => "SendTx",
            Self::GetReceipt => "GetReceipt",
            Self::GetContainerHeader => "GetContainerHeader",
            Self::GetGenesisHeader => "GetGenesisHeader",
            Self::GetBalance => "GetBalance",
            Self::Reset => "Reset",
            Self::Relay => "Relay",
            Self::Redeem => "Redeem",
            Self::Transfer => "Transfer",
        })
    }
}

/// The fixed prerequisite sequence that warms up on-chain state before a
/// reset, relay or redeem.
const TX_FAMILY: [StepKind; 4] = [
    StepKind::SendTx,
    StepKind::GetReceipt,
    StepKind::GetContainerHeader,
    StepKind::GetGenesisHeader,
];

/// Named preset selecting which ordered set of steps to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Run the whole relay process end to end.
    TestAll,
    /// Query the relay account balance.
    GetBalance,
    /// Reset the destination chain genesis header.
    ResetGenesis,
    /// Relay a header to the destination chain.
    RelayHeader,
    /// Redeem receipts on the destination chain.
    RedeemBalances,
}

/// Error returned when a strategy name is not recognized.
///
/// The binary treats this as a successful no-op run rather than a failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test-all" => Ok(Self::TestAll),
            "get-balance" => Ok(Self::GetBalance),
            "reset-genesis" => Ok(Self::ResetGenesis),
            "relay-header" => Ok(Self::RelayHeader),
            "redeem-balances" => Ok(Self::RedeemBalances),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl Strategy {
    /// Expand the strategy into the ordered step list.
    ///
    /// The `dynamic` flag prepends the transaction family (and any
    /// intermediate reset/relay steps) ahead of the requested operation.
    /// `TestAll` and `GetBalance` ignore the flag.
    #[must_use]
    pub fn expand(self, dynamic: bool) -> Vec<StepKind> {
        let mut events = Vec::new();
        match self {
            Self::TestAll => {
                events.extend(TX_FAMILY);
                events.extend([
                    StepKind::GetBalance,
                    StepKind::Reset,
                    StepKind::Relay,
                    StepKind::Redeem,
                ]);
            }
            Self::GetBalance => events.push(StepKind::GetBalance),
            Self::ResetGenesis => {
                if dynamic {
                    events.extend(TX_FAMILY);
                }
                events.push(StepKind::Reset);
            }
            Self::RelayHeader => {
                if dynamic {
                    events.extend(TX_FAMILY);
                    events.push(StepKind::Reset);
                }
                events.push(StepKind::Relay);
            }
            Self::RedeemBalances => {
                if dynamic {
                    events.extend(TX_FAMILY);
                    events.push(StepKind::Reset);
                    events.push(StepKind::Relay);
                }
                events.push(StepKind::Redeem);
            }
        }
        events
    }
}
