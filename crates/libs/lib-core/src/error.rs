//! # Centralized Error Handling
//!
//! [`IcoError`] is the single error type returned by every session, read and
//! transaction operation. The view layer matches on it to pick the feedback it
//! shows, so the variants follow what the user can act on rather than where the
//! failure came from.
//!
//! ## Error Categories
//!
//! 1. **Wallet / session**
//!    - [`WrongNetwork`](IcoError::WrongNetwork) - wallet is on another chain
//!    - [`UserRejected`](IcoError::UserRejected) - the user declined a wallet prompt
//!    - [`NotConnected`](IcoError::NotConnected) - the wallet exposes no account
//!
//! 2. **Chain**
//!    - [`ContractCallFailed`](IcoError::ContractCallFailed) - RPC failure, revert, or undecodable result
//!
//! 3. **Flow guards**
//!    - [`InvalidAmount`](IcoError::InvalidAmount) - mint amount not positive
//!    - [`TransactionInFlight`](IcoError::TransactionInFlight) - another mint/claim is running
//!    - [`ReadOnlyAuthority`](IcoError::ReadOnlyAuthority) - send attempted without signing rights
//!
//! 4. **Startup**
//!    - [`Config`](IcoError::Config) - invalid configuration
//!
//! ## Error Conversion
//!
//! - `From<ProviderError>` - EIP-1193 code 4001 becomes `UserRejected`, everything else `ContractCallFailed`
//! - `From<alloy_sol_types::Error>` - ABI decoding failures become `ContractCallFailed`

use thiserror::Error;

use crate::provider::ProviderError;

/// Convenience type alias for `Result<T, IcoError>`.
pub type Result<T> = std::result::Result<T, IcoError>;

/// Every failure the ICO flows can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IcoError {
    /// The wallet's active chain is not the one the contracts live on.
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The user declined the wallet prompt (connection or transaction).
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    /// The wallet returned no account to act for.
    #[error("Wallet not connected")]
    NotConnected,

    /// A contract read or write failed: RPC error, revert, or bad return data.
    #[error("Contract call failed: {0}")]
    ContractCallFailed(String),

    /// Mint amount was zero or the payment overflowed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A mint or claim is already waiting for confirmation.
    #[error("A transaction is already in flight")]
    TransactionInFlight,

    /// A transaction was sent through a read-only authority.
    #[error("Authority is read-only, a signer is required to send transactions")]
    ReadOnlyAuthority,

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IcoError {
    /// Message shown in the page's error banner.
    pub fn user_message(&self) -> String {
        match self {
            IcoError::WrongNetwork { expected, .. } => {
                format!("Switch your wallet to chain {} and try again", expected)
            }
            IcoError::UserRejected(_) => "Request rejected in the wallet".to_string(),
            IcoError::NotConnected => "Connect your wallet to continue".to_string(),
            IcoError::ContractCallFailed(_) => {
                "The transaction or query failed, check the console for details".to_string()
            }
            IcoError::InvalidAmount(msg) => msg.clone(),
            IcoError::TransactionInFlight => {
                "Please wait for the current transaction to confirm".to_string()
            }
            IcoError::ReadOnlyAuthority | IcoError::Config(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl From<ProviderError> for IcoError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(msg) => IcoError::UserRejected(msg),
            other => IcoError::ContractCallFailed(other.to_string()),
        }
    }
}

impl From<alloy_sol_types::Error> for IcoError {
    fn from(err: alloy_sol_types::Error) -> Self {
        IcoError::ContractCallFailed(format!("ABI decoding error: {}", err))
    }
}
