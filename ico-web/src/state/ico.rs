//! ICO page state management

use std::mem::Discriminant;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::reader::RefreshReport;
use lib_core::view::{self, IcoView, Summary, ViewInput};
use lib_core::{IcoClient, IcoConfig, IcoError, IcoStats};
use shared::utils::truncate_address;

use crate::services::wallet::{is_wallet_installed, BrowserWallet};

/// Global ICO context
#[derive(Clone, Copy)]
pub struct IcoContext {
    client: StoredValue<Arc<IcoClient<BrowserWallet>>>,
    pub stats: RwSignal<IcoStats>,
    pub connected: RwSignal<bool>,
    pub pending: RwSignal<bool>,
    pub mint_amount: RwSignal<u64>,
    pub account: RwSignal<Option<String>>,
    pub error: RwSignal<Option<IcoError>>,
    pub wallet_installed: bool,
}

impl IcoContext {
    pub fn new(config: IcoConfig) -> Self {
        let wallet = BrowserWallet::new(config.receipt_poll_interval_ms);
        Self {
            client: StoredValue::new(Arc::new(IcoClient::new(wallet, config))),
            stats: RwSignal::new(IcoStats::default()),
            connected: RwSignal::new(false),
            pending: RwSignal::new(false),
            mint_amount: RwSignal::new(0),
            account: RwSignal::new(None),
            error: RwSignal::new(None),
            wallet_installed: is_wallet_installed(),
        }
    }

    fn client(&self) -> Arc<IcoClient<BrowserWallet>> {
        self.client.get_value()
    }

    pub fn config(&self) -> IcoConfig {
        self.client.with_value(|client| client.config().clone())
    }

    /// View for the current signals (tracked).
    pub fn view(&self) -> IcoView {
        let input = ViewInput {
            connected: self.connected.get(),
            pending: self.pending.get(),
            claimable: self.stats.with(|stats| stats.claimable),
            mint_amount: self.mint_amount.get(),
        };
        self.client
            .with_value(|client| view::render(&input, client.config()))
    }

    /// Which view is showing, ignoring the data inside it.
    pub fn view_kind(&self) -> Discriminant<IcoView> {
        std::mem::discriminant(&self.view())
    }

    pub fn summary(&self) -> Summary {
        let stats = self.stats.get();
        self.client.with_value(|client| client.summary(&stats))
    }

    pub fn short_account(&self) -> Option<String> {
        self.account.with(|account| account.as_deref().map(truncate_address))
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    /// Connect the wallet and load state on first connection.
    pub fn connect(self) {
        let client = self.client();
        spawn_local(async move {
            match client.connect_and_load().await {
                Ok(Some(report)) => self.apply(&report),
                Ok(None) => {}
                Err(err) => self.fail("connect", err),
            }
            self.sync(&client).await;
        });
    }

    /// Re-read everything from the contracts.
    pub fn refresh(self) {
        let client = self.client();
        spawn_local(async move {
            let report = client.refresh().await;
            self.apply(&report);
        });
    }

    /// Mint the amount typed in the input.
    pub fn mint(self) {
        let amount = self.mint_amount.get_untracked();
        let client = self.client();
        if client.is_pending() {
            return;
        }
        self.pending.set(true);
        self.clear_error();

        spawn_local(async move {
            match client.mint(amount).await {
                Ok(outcome) => {
                    log::info!("mint of {} tokens confirmed in {}", amount, outcome.tx_hash);
                    self.mint_amount.set(0);
                    self.apply(&outcome.report);
                }
                Err(err) => self.fail("mint", err),
            }
            self.pending.set(client.is_pending());
        });
    }

    /// Claim tokens for every unclaimed NFT.
    pub fn claim(self) {
        let client = self.client();
        if client.is_pending() {
            return;
        }
        self.pending.set(true);
        self.clear_error();

        spawn_local(async move {
            match client.claim().await {
                Ok(outcome) => {
                    log::info!("claim confirmed in {}", outcome.tx_hash);
                    self.apply(&outcome.report);
                }
                Err(err) => self.fail("claim", err),
            }
            self.pending.set(client.is_pending());
        });
    }

    /// Ask the wallet to move to the required network, then reload.
    pub fn switch_network(self) {
        let client = self.client();
        spawn_local(async move {
            let chain_id = client.config().chain_id;
            match client.provider().switch_network(chain_id).await {
                Ok(()) => {
                    self.clear_error();
                    if client.is_connected() {
                        self.refresh();
                    } else {
                        self.connect();
                    }
                }
                Err(err) => self.fail("switch network", err.into()),
            }
        });
    }

    /// Forget the session; the next connect reloads everything.
    pub fn disconnect(&self) {
        self.client.with_value(|client| client.session().disconnect());
        self.connected.set(false);
        self.account.set(None);
        self.stats.set(IcoStats::default());
        self.clear_error();
    }

    fn apply(&self, report: &RefreshReport) {
        self.stats.set(report.stats.clone());
        self.error.set(report.first_error().cloned());
    }

    fn fail(&self, action: &str, err: IcoError) {
        match err {
            IcoError::TransactionInFlight => {
                log::debug!("{} ignored, a transaction is already in flight", action);
            }
            err => {
                log::error!("{} failed: {}", action, err);
                self.error.set(Some(err));
            }
        }
    }

    async fn sync(&self, client: &IcoClient<BrowserWallet>) {
        self.connected.set(client.is_connected());
        if client.is_connected() {
            match client.account().await {
                Ok(address) => self.account.set(Some(address.to_string())),
                Err(err) => log::warn!("could not resolve account: {}", err),
            }
        }
    }
}

/// Create the context and connect once for the page lifetime.
///
/// After "Forget Wallet" only the connect button reconnects.
pub fn provide_ico_context(config: IcoConfig) -> IcoContext {
    let context = IcoContext::new(config);
    provide_context(context);
    if context.wallet_installed {
        context.connect();
    }
    context
}

pub fn use_ico_context() -> IcoContext {
    expect_context::<IcoContext>()
}
