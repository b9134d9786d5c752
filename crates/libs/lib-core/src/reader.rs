//! # State Reader
//!
//! Rederives the three figures the page shows from the two contracts. Nothing is
//! cached: every call goes back to the chain, and each read acquires its own
//! authority so a network switch between reads is caught.
//!
//! ## Claimable count
//!
//! ```text
//! n = NFT.balanceOf(me)                   (n == 0 → 0, no further calls)
//! for i in 0..n:
//!     id = NFT.tokenOfOwnerByIndex(me, i)
//!     if !Token.tokenIdsClaimed(id): count += 1
//! ```
//!
//! Calls are strictly sequential, `1 + 2n` round trips for `n` owned NFTs.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::IcoConfig;
use crate::contracts::{ICryptoDevToken, ICryptoDevs};
use crate::error::{IcoError, Result};
use crate::provider::WalletProvider;
use crate::session::Session;
use shared::dto::ico::IcoStats;

/// One of the figures a refresh reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadField {
    ClaimableCount,
    TokenBalance,
    TotalMinted,
}

impl fmt::Display for ReadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReadField::ClaimableCount => "claimable count",
            ReadField::TokenBalance => "token balance",
            ReadField::TotalMinted => "total minted",
        };
        f.write_str(name)
    }
}

/// Result of a full refresh.
///
/// `stats` is always complete: a field whose read failed holds zero and its error
/// is listed in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub stats: IcoStats,
    pub errors: Vec<(ReadField, IcoError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: ReadField) -> Option<&IcoError> {
        self.errors
            .iter()
            .find(|(failed, _)| *failed == field)
            .map(|(_, err)| err)
    }

    /// The error the page should surface, if any.
    ///
    /// A wrong network or rejected prompt fails every field the same way, so the
    /// first error is representative.
    pub fn first_error(&self) -> Option<&IcoError> {
        self.errors.first().map(|(_, err)| err)
    }
}

/// Reads ICO state through a session.
pub struct StateReader<'a, P> {
    session: &'a Session<P>,
    config: &'a IcoConfig,
}

impl<'a, P: WalletProvider> StateReader<'a, P> {
    pub fn new(session: &'a Session<P>, config: &'a IcoConfig) -> Self {
        Self { session, config }
    }

    /// Owned NFTs whose tokens have not been claimed yet.
    #[instrument(skip(self))]
    pub async fn claimable_count(&self) -> Result<u64> {
        let authority = self.session.ensure_authority(false).await?;
        let owner = authority.address();
        let nft = self.config.nft_contract;

        let balance = authority
            .call(nft, &ICryptoDevs::balanceOfCall { owner })
            .await?;
        if balance.is_zero() {
            return Ok(0);
        }

        let balance: u64 = balance.try_into().map_err(|_| {
            IcoError::ContractCallFailed(format!("NFT balance {} does not fit in u64", balance))
        })?;

        let mut claimable = 0u64;
        for index in 0..balance {
            let token_id = authority
                .call(
                    nft,
                    &ICryptoDevs::tokenOfOwnerByIndexCall {
                        owner,
                        index: U256::from(index),
                    },
                )
                .await?;
            let claimed = authority
                .call(
                    self.config.token_contract,
                    &ICryptoDevToken::tokenIdsClaimedCall { tokenId: token_id },
                )
                .await?;
            if !claimed {
                claimable += 1;
            }
        }

        debug!(owned = balance, claimable, "claimable NFTs counted");
        Ok(claimable)
    }

    /// Token balance of the connected account, in wei.
    #[instrument(skip(self))]
    pub async fn token_balance(&self) -> Result<U256> {
        let authority = self.session.ensure_authority(false).await?;
        let account = authority.address();
        authority
            .call(
                self.config.token_contract,
                &ICryptoDevToken::balanceOfCall { account },
            )
            .await
    }

    /// Total token supply, in wei.
    #[instrument(skip(self))]
    pub async fn total_minted(&self) -> Result<U256> {
        let authority = self.session.ensure_authority(false).await?;
        authority
            .call(self.config.token_contract, &ICryptoDevToken::totalSupplyCall {})
            .await
    }

    /// Run all three reads in order.
    ///
    /// Never fails as a whole: each failed read is logged, zeroed and reported.
    pub async fn refresh(&self) -> RefreshReport {
        let mut report = RefreshReport::default();

        match self.claimable_count().await {
            Ok(claimable) => report.stats.claimable = claimable,
            Err(err) => record(&mut report, ReadField::ClaimableCount, err),
        }
        match self.token_balance().await {
            Ok(balance) => report.stats.token_balance = balance,
            Err(err) => record(&mut report, ReadField::TokenBalance, err),
        }
        match self.total_minted().await {
            Ok(minted) => report.stats.total_minted = minted,
            Err(err) => record(&mut report, ReadField::TotalMinted, err),
        }

        report
    }
}

fn record(report: &mut RefreshReport, field: ReadField, err: IcoError) {
    error!(%field, error = %err, "state read failed");
    report.errors.push((field, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;
    use crate::test_utils::{test_config, tokens, MockWallet, ALICE, BOB};

    fn session_with(wallet: MockWallet) -> Session<MockWallet> {
        let config = test_config();
        Session::new(wallet, config.chain_id, config.network_name)
    }

    #[tokio::test]
    async fn test_claimable_counts_unclaimed_flags() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_owned_nfts(&[(7, false), (12, true), (31, false)]);
        let session = session_with(wallet);

        let reader = StateReader::new(&session, &config);
        assert_eq!(reader.claimable_count().await.unwrap(), 2);

        let wallet = session.provider();
        assert_eq!(wallet.calls_to(ICryptoDevs::tokenOfOwnerByIndexCall::SELECTOR), 3);
        assert_eq!(wallet.calls_to(ICryptoDevToken::tokenIdsClaimedCall::SELECTOR), 3);
    }

    #[tokio::test]
    async fn test_claimable_zero_balance_skips_flags() {
        let config = test_config();
        let session = session_with(MockWallet::new(config.clone()));

        let reader = StateReader::new(&session, &config);
        assert_eq!(reader.claimable_count().await.unwrap(), 0);

        let wallet = session.provider();
        assert_eq!(wallet.contract_calls(), 1);
        assert_eq!(wallet.calls_to(ICryptoDevToken::tokenIdsClaimedCall::SELECTOR), 0);
    }

    #[tokio::test]
    async fn test_claimable_all_claimed() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_owned_nfts(&[(1, true), (2, true)]);
        let session = session_with(wallet);

        let reader = StateReader::new(&session, &config);
        assert_eq!(reader.claimable_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_token_balance_reads_connected_account() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_token_balance(ALICE, tokens(25));
        wallet.set_token_balance(BOB, tokens(3));
        let session = session_with(wallet);

        let reader = StateReader::new(&session, &config);
        assert_eq!(reader.token_balance().await.unwrap(), tokens(25));

        session.provider().set_accounts(vec![BOB]);
        assert_eq!(reader.token_balance().await.unwrap(), tokens(3));
    }

    #[tokio::test]
    async fn test_total_minted_is_idempotent() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_total_supply(tokens(420));
        let session = session_with(wallet);

        let reader = StateReader::new(&session, &config);
        let first = reader.total_minted().await.unwrap();
        let second = reader.total_minted().await.unwrap();
        assert_eq!(first, tokens(420));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_wrong_network_aborts_every_read() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_chain_id(1);
        let session = session_with(wallet);

        let reader = StateReader::new(&session, &config);
        let report = reader.refresh().await;

        assert_eq!(report.stats, IcoStats::default());
        assert_eq!(report.errors.len(), 3);
        assert_eq!(
            report.first_error(),
            Some(&IcoError::WrongNetwork { expected: 4, actual: 1 })
        );

        let wallet = session.provider();
        assert_eq!(wallet.contract_calls(), 0);
        assert_eq!(wallet.alerts().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_zeroes_only_failed_field() {
        let config = test_config();
        let wallet = MockWallet::new(config.clone());
        wallet.set_owned_nfts(&[(4, false)]);
        wallet.set_token_balance(ALICE, tokens(10));
        wallet.set_total_supply(tokens(500));
        wallet.fail_reads(ICryptoDevToken::totalSupplyCall::SELECTOR);
        let session = session_with(wallet);

        let report = StateReader::new(&session, &config).refresh().await;

        assert_eq!(report.stats.claimable, 1);
        assert_eq!(report.stats.token_balance, tokens(10));
        assert_eq!(report.stats.total_minted, U256::ZERO);
        assert!(!report.is_complete());
        assert!(matches!(
            report.error_for(ReadField::TotalMinted),
            Some(IcoError::ContractCallFailed(_))
        ));
        assert!(report.error_for(ReadField::TokenBalance).is_none());
    }

    #[test]
    fn test_read_field_serde() {
        let json = serde_json::to_string(&ReadField::TotalMinted).unwrap();
        assert_eq!(json, "\"total_minted\"");
        assert_eq!(ReadField::ClaimableCount.to_string(), "claimable count");
    }
}
