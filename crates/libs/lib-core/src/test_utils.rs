//! Scripted [`WalletProvider`] for tests.
//!
//! [`MockWallet`] plays both the wallet and the two contracts: calls are decoded
//! by selector, answered from in-memory state, and recorded as [`WalletEvent`]s
//! so tests can assert what was (or was not) sent to the chain. Mint and claim
//! transactions update the state the way the deployed contracts do.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{address, keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::config::IcoConfig;
use crate::contracts::{ICryptoDevToken, ICryptoDevs};
use crate::provider::{ProviderError, TransactionReceipt, TransactionRequest, WalletProvider};

/// Account the mock wallet exposes by default.
pub const ALICE: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

/// Second funded account, for account-switch scenarios.
pub const BOB: Address = address!("3c44cdddb6a900fa2b585dd299e03d12fa4293bc");

/// Valid configuration pointing at the mock's two contracts.
pub fn test_config() -> IcoConfig {
    IcoConfig {
        nft_contract: address!("5fbdb2315678afecb367f032d93f642f64180aa3"),
        token_contract: address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512"),
        ..IcoConfig::default()
    }
}

/// Whole tokens expressed in wei.
pub fn tokens(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
}

/// Everything the mock was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    RequestAccounts,
    ChainId,
    Call { to: Address, selector: [u8; 4] },
    Send { to: Address, selector: [u8; 4], value: U256 },
    Receipt(B256),
    Alert(String),
    Notify(String),
}

#[derive(Default)]
struct MockState {
    accounts: Vec<Address>,
    chain_id: u64,
    reject_accounts: bool,
    reject_transactions: bool,
    revert_transactions: bool,
    failing_reads: HashSet<[u8; 4]>,
    owned_nfts: Vec<U256>,
    claimed: HashSet<U256>,
    balances: HashMap<Address, U256>,
    total_supply: U256,
    receipts: HashMap<B256, bool>,
    sent: Vec<TransactionRequest>,
    events: Vec<WalletEvent>,
    next_nonce: u64,
    watched_flag: Option<Arc<AtomicBool>>,
    flag_at_calls: Vec<bool>,
}

/// Blocks receipt lookups until released.
#[derive(Default)]
struct ReceiptGate {
    held: AtomicBool,
    released: Notify,
}

impl ReceiptGate {
    async fn pass(&self) {
        loop {
            // Register before reading the flag
            let released = self.released.notified();
            if !self.held.load(Ordering::SeqCst) {
                return;
            }
            released.await;
        }
    }
}

/// In-memory wallet and contracts.
pub struct MockWallet {
    config: IcoConfig,
    state: Mutex<MockState>,
    gate: ReceiptGate,
}

impl MockWallet {
    /// Wallet on the configured chain exposing [`ALICE`], owning no NFTs.
    pub fn new(config: IcoConfig) -> Self {
        let state = MockState {
            accounts: vec![ALICE],
            chain_id: config.chain_id,
            ..MockState::default()
        };
        Self {
            config,
            state: Mutex::new(state),
            gate: ReceiptGate::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    // ---- scripting ----

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state().chain_id = chain_id;
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state().accounts = accounts;
    }

    /// Decline every `eth_requestAccounts` prompt.
    pub fn reject_accounts(&self) {
        self.state().reject_accounts = true;
    }

    /// Decline every transaction prompt.
    pub fn reject_transactions(&self) {
        self.state().reject_transactions = true;
    }

    /// Mine every later transaction with a failed status.
    pub fn revert_transactions(&self) {
        self.state().revert_transactions = true;
    }

    /// Make every `eth_call` with this selector fail.
    pub fn fail_reads(&self, selector: [u8; 4]) {
        self.state().failing_reads.insert(selector);
    }

    /// NFTs owned by the first account as `(token_id, claimed)` pairs.
    pub fn set_owned_nfts(&self, nfts: &[(u64, bool)]) {
        let mut state = self.state();
        state.owned_nfts = nfts.iter().map(|(id, _)| U256::from(*id)).collect();
        state.claimed = nfts
            .iter()
            .filter(|(_, claimed)| *claimed)
            .map(|(id, _)| U256::from(*id))
            .collect();
    }

    pub fn set_token_balance(&self, account: Address, balance: U256) {
        self.state().balances.insert(account, balance);
    }

    pub fn set_total_supply(&self, supply: U256) {
        self.state().total_supply = supply;
    }

    /// Park every receipt lookup until [`MockWallet::release_receipts`].
    pub fn hold_receipts(&self) {
        self.gate.held.store(true, Ordering::SeqCst);
    }

    pub fn release_receipts(&self) {
        self.gate.held.store(false, Ordering::SeqCst);
        self.gate.released.notify_waiters();
    }

    /// Record the value of `flag` at every later `eth_call`.
    pub fn watch_flag(&self, flag: Arc<AtomicBool>) {
        self.state().watched_flag = Some(flag);
    }

    // ---- inspection ----

    pub fn events(&self) -> Vec<WalletEvent> {
        self.state().events.clone()
    }

    /// Number of `eth_call`s made so far.
    pub fn contract_calls(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| matches!(event, WalletEvent::Call { .. }))
            .count()
    }

    /// Number of `eth_call`s made with the given selector.
    pub fn calls_to(&self, selector: [u8; 4]) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| matches!(event, WalletEvent::Call { selector: s, .. } if *s == selector))
            .count()
    }

    /// Values of the watched flag, one per `eth_call` made while watching.
    pub fn flag_at_calls(&self) -> Vec<bool> {
        self.state().flag_at_calls.clone()
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state().sent.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                WalletEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                WalletEvent::Notify(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn token_balance_of(&self, account: Address) -> U256 {
        self.state().balances.get(&account).copied().unwrap_or_default()
    }

    // ---- contract simulation ----

    fn answer_call(&self, state: &MockState, request: &TransactionRequest) -> Result<Bytes, ProviderError> {
        let selector = selector_of(&request.data)?;
        if state.failing_reads.contains(&selector) {
            return Err(ProviderError::from_rpc(-32000, "execution reverted"));
        }

        let data = &request.data[..];
        let encoded = if request.to == self.config.nft_contract {
            match selector {
                ICryptoDevs::balanceOfCall::SELECTOR => {
                    U256::from(state.owned_nfts.len()).abi_encode()
                }
                ICryptoDevs::tokenOfOwnerByIndexCall::SELECTOR => {
                    let call = <ICryptoDevs::tokenOfOwnerByIndexCall as SolCall>::abi_decode(data).map_err(decode_error)?;
                    let index = usize::try_from(call.index)
                        .map_err(|_| ProviderError::from_rpc(-32000, "index out of bounds"))?;
                    let token_id = state
                        .owned_nfts
                        .get(index)
                        .copied()
                        .ok_or_else(|| ProviderError::from_rpc(-32000, "owner index out of bounds"))?;
                    token_id.abi_encode()
                }
                _ => return Err(unknown_selector(selector)),
            }
        } else if request.to == self.config.token_contract {
            match selector {
                ICryptoDevToken::balanceOfCall::SELECTOR => {
                    let call = <ICryptoDevToken::balanceOfCall as SolCall>::abi_decode(data).map_err(decode_error)?;
                    state
                        .balances
                        .get(&call.account)
                        .copied()
                        .unwrap_or_default()
                        .abi_encode()
                }
                ICryptoDevToken::totalSupplyCall::SELECTOR => state.total_supply.abi_encode(),
                ICryptoDevToken::tokenIdsClaimedCall::SELECTOR => {
                    let call = <ICryptoDevToken::tokenIdsClaimedCall as SolCall>::abi_decode(data).map_err(decode_error)?;
                    state.claimed.contains(&call.tokenId).abi_encode()
                }
                _ => return Err(unknown_selector(selector)),
            }
        } else {
            return Err(ProviderError::from_rpc(-32000, format!("no contract at {}", request.to)));
        };

        Ok(encoded.into())
    }

    /// Apply a transaction; returns whether it succeeded.
    fn execute(&self, state: &mut MockState, request: &TransactionRequest) -> Result<bool, ProviderError> {
        if state.revert_transactions || request.to != self.config.token_contract {
            return Ok(false);
        }
        let sender = request.from.unwrap_or_default();

        match selector_of(&request.data)? {
            ICryptoDevToken::mintCall::SELECTOR => {
                let call = <ICryptoDevToken::mintCall as SolCall>::abi_decode(&request.data).map_err(decode_error)?;
                if request.value != call.amount * self.config.unit_price_wei {
                    return Ok(false);
                }
                let minted = call.amount * tokens(1);
                *state.balances.entry(sender).or_default() += minted;
                state.total_supply += minted;
                Ok(true)
            }
            ICryptoDevToken::claimCall::SELECTOR => {
                let unclaimed: Vec<U256> = state
                    .owned_nfts
                    .iter()
                    .filter(|id| !state.claimed.contains(id))
                    .copied()
                    .collect();
                if unclaimed.is_empty() {
                    return Ok(false);
                }
                let payout = tokens(self.config.tokens_per_nft) * U256::from(unclaimed.len());
                state.claimed.extend(unclaimed);
                *state.balances.entry(sender).or_default() += payout;
                state.total_supply += payout;
                Ok(true)
            }
            other => Err(unknown_selector(other)),
        }
    }
}

fn selector_of(data: &[u8]) -> Result<[u8; 4], ProviderError> {
    data.get(..4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .ok_or_else(|| ProviderError::from_rpc(-32602, "calldata shorter than a selector"))
}

fn decode_error(err: alloy_sol_types::Error) -> ProviderError {
    ProviderError::from_rpc(-32602, err.to_string())
}

fn unknown_selector(selector: [u8; 4]) -> ProviderError {
    ProviderError::from_rpc(-32000, format!("unknown selector 0x{}", alloy_primitives::hex::encode(selector)))
}

#[async_trait(?Send)]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut state = self.state();
        state.events.push(WalletEvent::RequestAccounts);
        if state.reject_accounts {
            return Err(ProviderError::from_rpc(4001, "User rejected the request."));
        }
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let mut state = self.state();
        state.events.push(WalletEvent::ChainId);
        Ok(state.chain_id)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ProviderError> {
        let mut state = self.state();
        state.events.push(WalletEvent::Call {
            to: request.to,
            selector: selector_of(&request.data)?,
        });
        if let Some(seen) = state.watched_flag.as_ref().map(|flag| flag.load(Ordering::SeqCst)) {
            state.flag_at_calls.push(seen);
        }
        self.answer_call(&state, request)
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ProviderError> {
        let mut state = self.state();
        state.events.push(WalletEvent::Send {
            to: request.to,
            selector: selector_of(&request.data)?,
            value: request.value,
        });
        if state.reject_transactions {
            return Err(ProviderError::from_rpc(4001, "User denied transaction signature."));
        }

        state.next_nonce += 1;
        let hash = keccak256(state.next_nonce.to_be_bytes());
        let status = self.execute(&mut state, request)?;
        state.receipts.insert(hash, status);
        state.sent.push(request.clone());
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<TransactionReceipt, ProviderError> {
        self.gate.pass().await;

        let mut state = self.state();
        state.events.push(WalletEvent::Receipt(hash));
        let status = state
            .receipts
            .get(&hash)
            .copied()
            .ok_or_else(|| ProviderError::Transport(format!("unknown transaction {}", hash)))?;
        let block_number = Some(state.next_nonce);
        Ok(TransactionReceipt {
            transaction_hash: hash,
            block_number,
            status,
        })
    }

    fn alert(&self, message: &str) {
        self.state().events.push(WalletEvent::Alert(message.to_string()));
    }

    fn notify(&self, message: &str) {
        self.state().events.push(WalletEvent::Notify(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_request(wallet: &MockWallet) -> TransactionRequest {
        let data = <ICryptoDevToken::claimCall as SolCall>::abi_encode(&ICryptoDevToken::claimCall {});
        TransactionRequest::new(ALICE, wallet.config.token_contract, data.into())
    }

    #[tokio::test]
    async fn test_held_receipt_waits_for_release() {
        let wallet = MockWallet::new(test_config());
        wallet.set_owned_nfts(&[(1, false)]);
        let hash = wallet.send_transaction(&claim_request(&wallet)).await.unwrap();
        wallet.hold_receipts();

        let lookup = wallet.transaction_receipt(hash);
        let release = async {
            for _ in 0..100 {
                tokio::task::yield_now().await;
            }
            assert!(!wallet.events().contains(&WalletEvent::Receipt(hash)));
            wallet.release_receipts();
        };
        let (receipt, ()) = tokio::join!(lookup, release);

        assert!(receipt.unwrap().status);
        assert!(wallet.events().contains(&WalletEvent::Receipt(hash)));
    }

    #[tokio::test]
    async fn test_receipts_pass_when_not_held() {
        let wallet = MockWallet::new(test_config());
        let hash = wallet.send_transaction(&claim_request(&wallet)).await.unwrap();

        // No unclaimed NFTs, so the claim reverts
        assert!(!wallet.transaction_receipt(hash).await.unwrap().status);
    }
}
