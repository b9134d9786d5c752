//! EIP-1193 Wallet Integration via wasm-bindgen
//!
//! Talks to the injected `window.ethereum` provider (MetaMask and compatible
//! wallets). Every request goes through one JS shim that normalizes wallet errors
//! to `{ code, message }` so the Rust side can tell a user rejection (4001) from
//! an RPC failure.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use lib_core::provider::{
    parse_quantity, ProviderError, TransactionReceipt, TransactionRequest, WalletProvider,
};
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

// ============================================================================
// EIP-1193 BINDINGS (JavaScript Interop)
// ============================================================================

#[wasm_bindgen(inline_js = "
export function isWalletInstalled() {
    return typeof window.ethereum !== 'undefined' && window.ethereum !== null;
}

export async function ethRequest(method, params) {
    if (!isWalletInstalled()) {
        throw { code: null, message: 'No Ethereum wallet found. Install MetaMask to continue.' };
    }
    try {
        const result = await window.ethereum.request({ method, params });
        return result === undefined ? null : result;
    } catch (error) {
        const code = (error && typeof error.code === 'number') ? error.code : null;
        const message = (error && error.message) ? error.message : String(error);
        throw { code, message };
    }
}
")]
extern "C" {
    /// Whether an injected EIP-1193 provider exists
    pub fn isWalletInstalled() -> bool;

    /// `window.ethereum.request({ method, params })`
    #[wasm_bindgen(catch)]
    async fn ethRequest(method: &str, params: JsValue) -> Result<JsValue, JsValue>;
}

// ============================================================================
// WALLET SERVICE
// ============================================================================

/// Check if a browser wallet is available
pub fn is_wallet_installed() -> bool {
    isWalletInstalled()
}

/// The injected browser wallet.
#[derive(Clone, Debug)]
pub struct BrowserWallet {
    receipt_poll_interval_ms: u32,
}

impl BrowserWallet {
    pub fn new(receipt_poll_interval_ms: u32) -> Self {
        Self {
            receipt_poll_interval_ms,
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ProviderError::Transport(format!("failed to encode params: {}", e)))?;

        match ethRequest(method, params).await {
            Ok(result) => serde_wasm_bindgen::from_value(result)
                .map_err(|e| ProviderError::Transport(format!("{} returned bad JSON: {}", method, e))),
            Err(err) => {
                let err = provider_error(&err);
                log::warn!("{} failed: {}", method, err);
                Err(err)
            }
        }
    }

    /// Ask the wallet to switch to `chain_id` (`wallet_switchEthereumChain`).
    pub async fn switch_network(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": format!("0x{:x}", chain_id) }]),
        )
        .await
        .map(|_| ())
    }
}

#[async_trait(?Send)]
impl WalletProvider for BrowserWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = self.request("eth_requestAccounts", json!([])).await?;
        decode_accounts(&result)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity(expect_str(&result, "eth_chainId")?)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ProviderError> {
        let result = self
            .request("eth_call", json!([request.to_rpc_json(), "latest"]))
            .await?;
        decode_bytes(&result)
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ProviderError> {
        let result = self
            .request("eth_sendTransaction", json!([request.to_rpc_json()]))
            .await?;
        decode_hash(&result)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<TransactionReceipt, ProviderError> {
        loop {
            let result = self
                .request("eth_getTransactionReceipt", json!([hash.to_string()]))
                .await?;
            if !result.is_null() {
                return TransactionReceipt::from_rpc_json(&result);
            }
            gloo_timers::future::TimeoutFuture::new(self.receipt_poll_interval_ms).await;
        }
    }

    fn alert(&self, message: &str) {
        let shown = web_sys::window()
            .map(|window| window.alert_with_message(message).is_ok())
            .unwrap_or(false);
        if !shown {
            log::warn!("alert could not be shown: {}", message);
        }
    }
}

// ============================================================================
// RESPONSE DECODING
// ============================================================================

/// Map a rejected `ethRequest` promise to a provider error.
fn provider_error(err: &JsValue) -> ProviderError {
    let message = js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    let code = js_sys::Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|value| value.as_f64());

    match code {
        Some(code) => ProviderError::from_rpc(code as i64, message),
        None => ProviderError::Transport(message),
    }
}

fn expect_str<'a>(value: &'a Value, method: &str) -> Result<&'a str, ProviderError> {
    value
        .as_str()
        .ok_or_else(|| ProviderError::Transport(format!("{} did not return a string", method)))
}

fn decode_accounts(value: &Value) -> Result<Vec<Address>, ProviderError> {
    let accounts = value
        .as_array()
        .ok_or_else(|| ProviderError::Transport("eth_requestAccounts did not return a list".to_string()))?;

    accounts
        .iter()
        .map(|account| {
            expect_str(account, "eth_requestAccounts")?
                .parse::<Address>()
                .map_err(|e| ProviderError::Transport(format!("invalid account address: {}", e)))
        })
        .collect()
}

fn decode_bytes(value: &Value) -> Result<Bytes, ProviderError> {
    expect_str(value, "eth_call")?
        .parse::<Bytes>()
        .map_err(|e| ProviderError::Transport(format!("invalid call result: {}", e)))
}

fn decode_hash(value: &Value) -> Result<B256, ProviderError> {
    expect_str(value, "eth_sendTransaction")?
        .parse::<B256>()
        .map_err(|e| ProviderError::Transport(format!("invalid transaction hash: {}", e)))
}
