//! # Transaction Submitter
//!
//! Mint and claim flows. At most one flow runs at a time: the in-flight marker is
//! taken with a compare-exchange before the first `.await` and released by a guard
//! on every exit path.
//!
//! ```text
//! acquire marker ─► signer authority ─► send ─► wait for receipt
//!        ─► refresh (claimable, balance, total) ─► notify ─► release marker
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::{B256, U256};
use tracing::{error, info, instrument, warn};

use crate::config::IcoConfig;
use crate::contracts::ICryptoDevToken;
use crate::error::{IcoError, Result};
use crate::provider::WalletProvider;
use crate::reader::{RefreshReport, StateReader};
use crate::session::Session;

/// Result of a confirmed mint or claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: B256,
    /// State as re-read after confirmation
    pub report: RefreshReport,
}

/// Wei to pay for `amount` whole tokens.
pub fn mint_payment(amount: u64, unit_price_wei: U256) -> Result<U256> {
    if amount == 0 {
        return Err(IcoError::InvalidAmount(
            "Enter a number of tokens greater than zero".to_string(),
        ));
    }
    U256::from(amount)
        .checked_mul(unit_price_wei)
        .ok_or_else(|| IcoError::InvalidAmount(format!("payment for {} tokens overflows", amount)))
}

/// Releases the in-flight marker when dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| IcoError::TransactionInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Sends mint/claim transactions and re-reads state afterwards.
pub struct TransactionSubmitter<'a, P> {
    session: &'a Session<P>,
    config: &'a IcoConfig,
    in_flight: &'a AtomicBool,
}

impl<'a, P: WalletProvider> TransactionSubmitter<'a, P> {
    pub fn new(session: &'a Session<P>, config: &'a IcoConfig, in_flight: &'a AtomicBool) -> Self {
        Self {
            session,
            config,
            in_flight,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Buy `amount` whole tokens at the configured unit price.
    #[instrument(skip(self))]
    pub async fn mint(&self, amount: u64) -> Result<TxOutcome> {
        let value = mint_payment(amount, self.config.unit_price_wei)?;
        let _guard = InFlightGuard::acquire(self.in_flight)?;

        let call = ICryptoDevToken::mintCall {
            amount: U256::from(amount),
        };
        let outcome = self
            .submit(&call, value, "Successfully minted Crypto Dev Tokens")
            .await?;
        info!(amount, %value, tx = %outcome.tx_hash, "mint confirmed");
        Ok(outcome)
    }

    /// Claim the tokens owed for every unclaimed NFT.
    #[instrument(skip(self))]
    pub async fn claim(&self) -> Result<TxOutcome> {
        let _guard = InFlightGuard::acquire(self.in_flight)?;

        let outcome = self
            .submit(
                &ICryptoDevToken::claimCall {},
                U256::ZERO,
                "Successfully claimed Crypto Dev Tokens",
            )
            .await?;
        info!(tx = %outcome.tx_hash, "claim confirmed");
        Ok(outcome)
    }

    async fn submit<C: alloy_sol_types::SolCall>(
        &self,
        call: &C,
        value: U256,
        success_message: &str,
    ) -> Result<TxOutcome> {
        let authority = self.session.ensure_authority(true).await?;

        let tx_hash = authority
            .send(self.config.token_contract, call, value)
            .await
            .map_err(|err| {
                warn!(function = C::SIGNATURE, error = %err, "transaction not submitted");
                err
            })?;
        info!(function = C::SIGNATURE, tx = %tx_hash, "transaction submitted, waiting for receipt");

        authority.wait_for_receipt(tx_hash).await.map_err(|err| {
            error!(function = C::SIGNATURE, tx = %tx_hash, error = %err, "transaction failed");
            err
        })?;

        let report = StateReader::new(self.session, self.config).refresh().await;
        self.session.provider().notify(success_message);

        Ok(TxOutcome { tx_hash, report })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use alloy_sol_types::SolCall;
    use crate::test_utils::{test_config, tokens, MockWallet, WalletEvent, ALICE};

    struct Fixture {
        config: IcoConfig,
        session: Session<MockWallet>,
        in_flight: Arc<AtomicBool>,
    }

    impl Fixture {
        fn new(setup: impl FnOnce(&MockWallet)) -> Self {
            let config = test_config();
            let wallet = MockWallet::new(config.clone());
            setup(&wallet);
            let in_flight = Arc::new(AtomicBool::new(false));
            wallet.watch_flag(Arc::clone(&in_flight));
            Self {
                session: Session::new(wallet, config.chain_id, config.network_name.clone()),
                config,
                in_flight,
            }
        }

        fn submitter(&self) -> TransactionSubmitter<'_, MockWallet> {
            TransactionSubmitter::new(&self.session, &self.config, &self.in_flight)
        }

        fn wallet(&self) -> &MockWallet {
            self.session.provider()
        }
    }

    #[test]
    fn test_mint_payment_is_exact() {
        let price = U256::from(1_000_000_000_000_000u64);
        assert_eq!(
            mint_payment(5, price).unwrap(),
            U256::from(5_000_000_000_000_000u64)
        );
        assert_eq!(
            shared::utils::format_ether(mint_payment(5, price).unwrap()),
            "0.005"
        );
        assert!(matches!(mint_payment(0, price), Err(IcoError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_mint_zero_touches_nothing() {
        let fixture = Fixture::new(|_| {});

        let err = fixture.submitter().mint(0).await.unwrap_err();
        assert!(matches!(err, IcoError::InvalidAmount(_)));
        assert!(fixture.wallet().events().is_empty());
        assert!(!fixture.submitter().is_pending());
    }

    #[tokio::test]
    async fn test_mint_pays_amount_times_price() {
        let fixture = Fixture::new(|_| {});

        let outcome = fixture.submitter().mint(5).await.unwrap();

        let sent = fixture.wallet().sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, fixture.config.token_contract);
        assert_eq!(sent[0].from, Some(ALICE));
        assert_eq!(sent[0].value, U256::from(5_000_000_000_000_000u64));

        assert_eq!(outcome.report.stats.token_balance, tokens(5));
        assert_eq!(outcome.report.stats.total_minted, tokens(5));
        assert!(outcome.report.is_complete());
        assert_eq!(
            fixture.wallet().notifications(),
            vec!["Successfully minted Crypto Dev Tokens".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_runs_after_receipt_and_before_notify() {
        let fixture = Fixture::new(|wallet| wallet.set_owned_nfts(&[(1, false), (2, false)]));

        let outcome = fixture.submitter().claim().await.unwrap();
        assert_eq!(outcome.report.stats.claimable, 0);
        assert_eq!(outcome.report.stats.token_balance, tokens(20));

        let events = fixture.wallet().events();
        let receipt = events
            .iter()
            .position(|e| matches!(e, WalletEvent::Receipt(_)))
            .unwrap();
        let notify = events
            .iter()
            .position(|e| matches!(e, WalletEvent::Notify(_)))
            .unwrap();
        let reads_after_receipt: Vec<[u8; 4]> = events[receipt..notify]
            .iter()
            .filter_map(|e| match e {
                WalletEvent::Call { selector, .. } => Some(*selector),
                _ => None,
            })
            .collect();

        assert!(reads_after_receipt.contains(&crate::contracts::ICryptoDevs::balanceOfCall::SELECTOR));
        assert!(reads_after_receipt.contains(&ICryptoDevToken::balanceOfCall::SELECTOR));
        assert!(reads_after_receipt.contains(&ICryptoDevToken::totalSupplyCall::SELECTOR));
        assert_eq!(notify, events.len() - 1);
    }

    #[tokio::test]
    async fn test_marker_held_during_post_receipt_refresh() {
        let fixture = Fixture::new(|wallet| wallet.set_owned_nfts(&[(4, false), (7, true)]));

        fixture.submitter().claim().await.unwrap();

        let events = fixture.wallet().events();
        let receipt = events
            .iter()
            .position(|e| matches!(e, WalletEvent::Receipt(_)))
            .unwrap();
        let reads_after_receipt = events[receipt..]
            .iter()
            .filter(|e| matches!(e, WalletEvent::Call { .. }))
            .count();
        let seen = fixture.wallet().flag_at_calls();

        assert!(reads_after_receipt >= 3);
        assert_eq!(seen.len(), fixture.wallet().contract_calls());
        assert!(seen[seen.len() - reads_after_receipt..].iter().all(|pending| *pending));
        assert!(!fixture.submitter().is_pending());
    }

    #[tokio::test]
    async fn test_claim_sends_no_value() {
        let fixture = Fixture::new(|wallet| wallet.set_owned_nfts(&[(9, false)]));

        fixture.submitter().claim().await.unwrap();

        let sent = fixture.wallet().sent_transactions();
        assert_eq!(sent[0].value, U256::ZERO);
        assert_eq!(&sent[0].data[..], &ICryptoDevToken::claimCall::SELECTOR[..]);
    }

    #[tokio::test]
    async fn test_second_flow_rejected_while_in_flight() {
        let fixture = Fixture::new(|_| {});
        fixture.in_flight.store(true, Ordering::SeqCst);

        assert_eq!(
            fixture.submitter().claim().await.unwrap_err(),
            IcoError::TransactionInFlight
        );
        assert!(fixture.wallet().events().is_empty());
    }

    #[tokio::test]
    async fn test_marker_released_after_rejection() {
        let fixture = Fixture::new(|wallet| wallet.reject_transactions());

        let err = fixture.submitter().mint(1).await.unwrap_err();
        assert!(matches!(err, IcoError::UserRejected(_)));
        assert!(!fixture.submitter().is_pending());
        assert!(fixture.wallet().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_reverted_claim_reports_failure() {
        let fixture = Fixture::new(|wallet| wallet.set_owned_nfts(&[(3, true)]));

        let err = fixture.submitter().claim().await.unwrap_err();
        assert!(matches!(err, IcoError::ContractCallFailed(_)));
        assert!(!fixture.submitter().is_pending());
        assert!(fixture.wallet().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_network_blocks_send() {
        let fixture = Fixture::new(|wallet| wallet.set_chain_id(1));

        let err = fixture.submitter().mint(2).await.unwrap_err();
        assert_eq!(err, IcoError::WrongNetwork { expected: 4, actual: 1 });
        assert!(fixture.wallet().sent_transactions().is_empty());
        assert_eq!(fixture.wallet().contract_calls(), 0);
        assert_eq!(fixture.wallet().alerts().len(), 1);
    }
}
