//! # ICO Core Library
//!
//! Wallet session, on-chain state reconciliation and transaction submission for the
//! Crypto Devs ICO page. Nothing in here touches the DOM; the browser crate plugs a
//! concrete [`provider::WalletProvider`] in and renders [`view::IcoView`].
//!
//! ## Architecture
//!
//! ```text
//! user action → TransactionSubmitter → wallet / chain
//!                        │
//!                        ▼
//!                  StateReader (refresh) → IcoStats → view::render → user action
//! ```
//!
//! - [`session`]: Connection Manager, network check, [`session::Authority`]
//! - [`reader`]: claimable count, token balance, total minted
//! - [`submitter`]: mint and claim flows with an in-flight marker
//! - [`view`]: pure state → view mapping
//! - [`client`]: [`client::IcoClient`], the facade the page holds

pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod provider;
pub mod reader;
pub mod session;
pub mod submitter;
pub mod view;

/// Scripted wallet used by unit and integration tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use client::IcoClient;
pub use config::IcoConfig;
pub use error::{IcoError, Result};
pub use provider::{ProviderError, WalletProvider};
pub use shared::dto::ico::IcoStats;
