//! # Connection Manager
//!
//! A [`Session`] owns the wallet provider for the page lifetime and hands out an
//! [`Authority`] for every read or write. Each authority is acquired fresh: the
//! wallet is asked for its account and chain on every call, so switching accounts
//! or networks in the wallet takes effect on the next operation.
//!
//! ## Flow
//!
//! ```text
//! ensure_authority(require_write)
//!   ├─ eth_requestAccounts   (may prompt; decline → UserRejected)
//!   ├─ eth_chainId           (mismatch → alert + WrongNetwork)
//!   ├─ first success         → connected = true
//!   └─ Authority { ReadOnly | Signer } for the selected account
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use tracing::{debug, error, info, warn};

use crate::error::{IcoError, Result};
use crate::provider::{TransactionReceipt, TransactionRequest, WalletProvider};

/// What an [`Authority`] may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityKind {
    /// Contract reads only
    ReadOnly,
    /// Reads plus signed transactions
    Signer,
}

impl fmt::Display for AuthorityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityKind::ReadOnly => write!(f, "read-only"),
            AuthorityKind::Signer => write!(f, "signer"),
        }
    }
}

/// Wallet session with a required network.
pub struct Session<P> {
    provider: P,
    required_chain_id: u64,
    network_name: String,
    connected: AtomicBool,
}

impl<P: WalletProvider> Session<P> {
    pub fn new(provider: P, required_chain_id: u64, network_name: impl Into<String>) -> Self {
        Self {
            provider,
            required_chain_id,
            network_name: network_name.into(),
            connected: AtomicBool::new(false),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn required_chain_id(&self) -> u64 {
        self.required_chain_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Establish the session.
    ///
    /// Returns `true` when this call moved the session from disconnected to
    /// connected, which is the cue for the initial state load.
    pub async fn connect(&self) -> Result<bool> {
        let (authority, transitioned) = self.authorize(AuthorityKind::ReadOnly).await?;
        if transitioned {
            info!(address = %authority.address(), chain_id = self.required_chain_id, "wallet connected");
        }
        Ok(transitioned)
    }

    /// Forget the connection; the next [`Session::connect`] is a transition again.
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!("wallet session cleared");
        }
    }

    /// Acquire an authority for the next operation.
    ///
    /// With `require_write` the authority can sign transactions; otherwise it can
    /// only read, though it still knows the account address.
    pub async fn ensure_authority(&self, require_write: bool) -> Result<Authority<'_, P>> {
        let kind = if require_write {
            AuthorityKind::Signer
        } else {
            AuthorityKind::ReadOnly
        };
        let (authority, _) = self.authorize(kind).await?;
        Ok(authority)
    }

    async fn authorize(&self, kind: AuthorityKind) -> Result<(Authority<'_, P>, bool)> {
        let accounts = self.provider.request_accounts().await.map_err(|err| {
            warn!(%err, "wallet did not grant account access");
            IcoError::from(err)
        })?;
        let account = accounts.first().copied().ok_or(IcoError::NotConnected)?;

        let chain_id = self.provider.chain_id().await?;
        if chain_id != self.required_chain_id {
            error!(
                expected = self.required_chain_id,
                actual = chain_id,
                "wallet is on the wrong network"
            );
            self.provider
                .alert(&format!("Change your wallet network to {}", self.network_name));
            return Err(IcoError::WrongNetwork {
                expected: self.required_chain_id,
                actual: chain_id,
            });
        }

        let transitioned = !self.connected.swap(true, Ordering::SeqCst);
        debug!(%account, %kind, "authority acquired");

        Ok((
            Authority {
                provider: &self.provider,
                account,
                kind,
            },
            transitioned,
        ))
    }
}

/// Capability to read from (and for signers, write to) the chain as one account.
pub struct Authority<'a, P> {
    provider: &'a P,
    account: Address,
    kind: AuthorityKind,
}

impl<'a, P: WalletProvider> Authority<'a, P> {
    pub fn address(&self) -> Address {
        self.account
    }

    pub fn kind(&self) -> AuthorityKind {
        self.kind
    }

    pub fn is_signer(&self) -> bool {
        self.kind == AuthorityKind::Signer
    }

    /// `eth_call` a contract function and decode its return value.
    pub async fn call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
        let request = TransactionRequest::new(self.account, to, call.abi_encode().into());
        let output = self.provider.call(&request).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    /// Submit a contract call as a signed transaction carrying `value` wei.
    pub async fn send<C: SolCall>(&self, to: Address, call: &C, value: U256) -> Result<B256> {
        if !self.is_signer() {
            return Err(IcoError::ReadOnlyAuthority);
        }

        let request =
            TransactionRequest::new(self.account, to, call.abi_encode().into()).with_value(value);
        Ok(self.provider.send_transaction(&request).await?)
    }

    /// Wait for the transaction to be mined; a reverted transaction is an error.
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt> {
        let receipt = self.provider.transaction_receipt(hash).await?;
        if !receipt.status {
            return Err(IcoError::ContractCallFailed(format!(
                "transaction {} reverted",
                hash
            )));
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ICryptoDevToken;
    use crate::test_utils::{test_config, MockWallet, ALICE};

    fn session(wallet: MockWallet) -> Session<MockWallet> {
        Session::new(wallet, 4, "Rinkeby")
    }

    #[tokio::test]
    async fn test_connect_reports_transition_once() {
        let session = session(MockWallet::new(test_config()));
        assert!(!session.is_connected());

        assert!(session.connect().await.unwrap());
        assert!(session.is_connected());
        assert!(!session.connect().await.unwrap());

        session.disconnect();
        assert!(!session.is_connected());
        assert!(session.connect().await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_network_alerts_and_aborts() {
        let wallet = MockWallet::new(test_config());
        wallet.set_chain_id(1);
        let session = session(wallet);

        let err = session.ensure_authority(false).await.err().unwrap();
        assert_eq!(err, IcoError::WrongNetwork { expected: 4, actual: 1 });
        assert!(!session.is_connected());

        let alerts = session.provider().alerts();
        assert_eq!(alerts, vec!["Change your wallet network to Rinkeby".to_string()]);
        assert_eq!(session.provider().contract_calls(), 0);
    }

    #[tokio::test]
    async fn test_user_rejection() {
        let wallet = MockWallet::new(test_config());
        wallet.reject_accounts();
        let session = session(wallet);

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, IcoError::UserRejected(_)));
        assert!(session.provider().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_no_accounts_is_not_connected() {
        let wallet = MockWallet::new(test_config());
        wallet.set_accounts(vec![]);
        let session = session(wallet);

        assert_eq!(session.connect().await.unwrap_err(), IcoError::NotConnected);
    }

    #[tokio::test]
    async fn test_authority_kinds() {
        let session = session(MockWallet::new(test_config()));

        let reader = session.ensure_authority(false).await.unwrap();
        assert_eq!(reader.kind(), AuthorityKind::ReadOnly);
        assert_eq!(reader.address(), ALICE);

        let signer = session.ensure_authority(true).await.unwrap();
        assert!(signer.is_signer());
        assert_eq!(signer.address(), ALICE);
    }

    #[tokio::test]
    async fn test_read_only_authority_cannot_send() {
        let config = test_config();
        let session = session(MockWallet::new(config.clone()));

        let reader = session.ensure_authority(false).await.unwrap();
        let err = reader
            .send(config.token_contract, &ICryptoDevToken::claimCall {}, U256::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, IcoError::ReadOnlyAuthority);
        assert!(session.provider().sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_contract_failure() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.revert_transactions();
        let session = session(wallet);

        let signer = session.ensure_authority(true).await.unwrap();
        let hash = signer
            .send(config.token_contract, &ICryptoDevToken::claimCall {}, U256::ZERO)
            .await
            .unwrap();
        let err = signer.wait_for_receipt(hash).await.unwrap_err();
        assert!(matches!(err, IcoError::ContractCallFailed(msg) if msg.contains("reverted")));
    }
}
