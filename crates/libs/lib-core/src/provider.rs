//! # Wallet Provider Seam
//!
//! [`WalletProvider`] is everything the core needs from a browser wallet: account
//! access, the active chain, `eth_call`, transaction submission, receipts and a way
//! to tell the user something. The browser crate implements it over EIP-1193
//! (`window.ethereum.request`); tests implement it with a scripted mock.
//!
//! The request/receipt types carry their EIP-1193 JSON encoding so every
//! implementation speaks the same wire format.

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// EIP-1193 error code for "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Failure reported by the wallet or its RPC endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The user declined the prompt (EIP-1193 code 4001)
    #[error("request rejected by user: {0}")]
    Rejected(String),

    /// JSON-RPC error returned by the node or wallet
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// No wallet, malformed response, or a failure outside JSON-RPC
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Classify a JSON-RPC error by its code.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED_CODE {
            ProviderError::Rejected(message)
        } else {
            ProviderError::Rpc { code, message }
        }
    }
}

/// A call or transaction against a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl TransactionRequest {
    pub fn new(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from: Some(from),
            to,
            value: U256::ZERO,
            data,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// EIP-1193 transaction object (`eth_call` / `eth_sendTransaction` param).
    pub fn to_rpc_json(&self) -> Value {
        let mut object = Map::new();
        if let Some(from) = self.from {
            object.insert("from".to_string(), json!(from.to_string()));
        }
        object.insert("to".to_string(), json!(self.to.to_string()));
        if !self.value.is_zero() {
            object.insert("value".to_string(), json!(format_quantity(self.value)));
        }
        object.insert("data".to_string(), json!(hex::encode_prefixed(&self.data)));
        Value::Object(object)
    }
}

/// The parts of a mined transaction's receipt the page cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    /// `true` when the transaction executed without reverting
    pub status: bool,
}

impl TransactionReceipt {
    /// Parse an `eth_getTransactionReceipt` result object.
    pub fn from_rpc_json(value: &Value) -> Result<Self, ProviderError> {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| ProviderError::Transport(format!("receipt is missing '{}'", name)))
        };

        let transaction_hash = field("transactionHash")?
            .parse::<B256>()
            .map_err(|e| ProviderError::Transport(format!("invalid transaction hash: {}", e)))?;
        let block_number = match value.get("blockNumber").and_then(Value::as_str) {
            Some(number) => Some(parse_quantity(number)?),
            None => None,
        };
        // Pre-Byzantium receipts have no status; treat them as successful
        let status = match value.get("status").and_then(Value::as_str) {
            Some(status) => parse_quantity(status)? == 1,
            None => true,
        };

        Ok(Self {
            transaction_hash,
            block_number,
            status,
        })
    }
}

/// Encode a value as a JSON-RPC quantity (`0x`-prefixed, no leading zeros).
pub fn format_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Decode a JSON-RPC quantity such as a chain id or block number.
pub fn parse_quantity(quantity: &str) -> Result<u64, ProviderError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| ProviderError::Transport(format!("quantity '{}' is not 0x-prefixed", quantity)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::Transport(format!("invalid quantity '{}': {}", quantity, e)))
}

/// A browser wallet, as seen by the session.
///
/// Futures are not `Send`: wallet calls run on the single browser thread.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Ask the wallet for its accounts, prompting the user if needed
    /// (`eth_requestAccounts`). May suspend until the user answers.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Active chain id (`eth_chainId`).
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Execute a read-only call against the latest block (`eth_call`).
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ProviderError>;

    /// Sign and submit a transaction (`eth_sendTransaction`), returning its hash.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ProviderError>;

    /// Wait until the transaction is mined and return its receipt.
    ///
    /// No timeout: this resolves when the chain includes the transaction.
    async fn transaction_receipt(&self, hash: B256) -> Result<TransactionReceipt, ProviderError>;

    /// Blocking user-facing alert.
    fn alert(&self, message: &str);

    /// Non-error notification, e.g. "tokens minted".
    fn notify(&self, message: &str) {
        self.alert(message);
    }
}
