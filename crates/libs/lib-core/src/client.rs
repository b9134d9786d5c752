//! # ICO Client
//!
//! [`IcoClient`] is what the page holds for its whole lifetime: the wallet
//! session, the configuration and the in-flight marker, with the reader and
//! submitter built on demand over borrowed state.
//!
//! ```rust,ignore
//! let client = IcoClient::new(BrowserWallet::new(poll_ms), config);
//!
//! if let Some(report) = client.connect_and_load().await? {
//!     stats.set(report.stats);
//! }
//! let outcome = client.mint(5).await?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::Address;
use tracing::{info, warn};

use crate::config::IcoConfig;
use crate::error::Result;
use crate::provider::WalletProvider;
use crate::reader::{RefreshReport, StateReader};
use crate::session::Session;
use crate::submitter::{TransactionSubmitter, TxOutcome};
use crate::view::{self, IcoView, Summary, ViewInput};
use shared::dto::ico::IcoStats;

pub struct IcoClient<P> {
    session: Session<P>,
    config: IcoConfig,
    in_flight: AtomicBool,
}

impl<P: WalletProvider> IcoClient<P> {
    pub fn new(provider: P, config: IcoConfig) -> Self {
        let session = Session::new(provider, config.chain_id, config.network_name.clone());
        Self {
            session,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &IcoConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    pub fn provider(&self) -> &P {
        self.session.provider()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// True while a mint or claim is running.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Connect the wallet; `true` on the disconnected → connected transition.
    pub async fn connect(&self) -> Result<bool> {
        self.session.connect().await
    }

    /// Account the wallet currently acts for.
    pub async fn account(&self) -> Result<Address> {
        let authority = self.session.ensure_authority(false).await?;
        Ok(authority.address())
    }

    /// Connect and, on the transition, load the initial state.
    ///
    /// Returns `None` when the session was already connected.
    pub async fn connect_and_load(&self) -> Result<Option<RefreshReport>> {
        if !self.connect().await? {
            return Ok(None);
        }

        let report = self.refresh().await;
        if report.is_complete() {
            info!(claimable = report.stats.claimable, "initial state loaded");
        } else {
            warn!(failed = report.errors.len(), "initial state loaded with errors");
        }
        Ok(Some(report))
    }

    /// Re-read claimable count, token balance and total minted.
    pub async fn refresh(&self) -> RefreshReport {
        self.reader().refresh().await
    }

    pub async fn mint(&self, amount: u64) -> Result<TxOutcome> {
        self.submitter().mint(amount).await
    }

    pub async fn claim(&self) -> Result<TxOutcome> {
        self.submitter().claim().await
    }

    pub fn reader(&self) -> StateReader<'_, P> {
        StateReader::new(&self.session, &self.config)
    }

    pub fn submitter(&self) -> TransactionSubmitter<'_, P> {
        TransactionSubmitter::new(&self.session, &self.config, &self.in_flight)
    }

    /// Current view for the given state and typed mint amount.
    pub fn view(&self, stats: &IcoStats, mint_amount: u64) -> IcoView {
        let input = ViewInput {
            connected: self.is_connected(),
            pending: self.is_pending(),
            claimable: stats.claimable,
            mint_amount,
        };
        view::render(&input, &self.config)
    }

    pub fn summary(&self, stats: &IcoStats) -> Summary {
        view::summary(stats, &self.config)
    }
}
