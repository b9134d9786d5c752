//! # ICO Configuration
//!
//! Network, contract addresses and pricing for the ICO page. The defaults describe
//! the Rinkeby deployment (chain 4, 0.001 ether per token, 10 tokens per NFT, a
//! 10000 token cap); the contract addresses have no default and must be supplied.
//!
//! ## Sources
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `ICO_CHAIN_ID` | [`IcoConfig::chain_id`] | `4` |
//! | `ICO_NETWORK_NAME` | [`IcoConfig::network_name`] | `Rinkeby` |
//! | `ICO_NFT_CONTRACT` | [`IcoConfig::nft_contract`] | required |
//! | `ICO_TOKEN_CONTRACT` | [`IcoConfig::token_contract`] | required |
//! | `ICO_UNIT_PRICE` | [`IcoConfig::unit_price_wei`] (in ether) | `0.001` |
//! | `ICO_TOKENS_PER_NFT` | [`IcoConfig::tokens_per_nft`] | `10` |
//! | `ICO_MAX_SUPPLY` | [`IcoConfig::max_supply`] | `10000` |
//! | `ICO_RECEIPT_POLL_MS` | [`IcoConfig::receipt_poll_interval_ms`] | `1000` |
//!
//! The browser build has no process environment, so it bakes the variables in at
//! compile time with [`IcoConfig::from_build_env`]. Native tools and tests use
//! [`IcoConfig::from_env`] (which also reads a `.env` file) or
//! [`IcoConfig::from_lookup`] directly.
//!
//! ## Global Config Access
//!
//! ```rust,no_run
//! use lib_core::config::{core_config, init_config, IcoConfig};
//!
//! init_config(IcoConfig::from_env().unwrap()).unwrap();
//! let chain_id = core_config().chain_id;
//! ```

use std::str::FromStr;
use std::sync::OnceLock;

use alloy_primitives::{Address, U256};

/// Configuration of the ICO page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcoConfig {
    /// Chain id every operation requires the wallet to be on
    pub chain_id: u64,

    /// Human-readable name of `chain_id`, used in the wrong-network alert
    pub network_name: String,

    /// Crypto Devs NFT collection (ERC-721 enumerable)
    pub nft_contract: Address,

    /// Crypto Dev Token (ERC-20 with mint/claim)
    pub token_contract: Address,

    /// Price of one whole token, in wei
    pub unit_price_wei: U256,

    /// Whole tokens paid out per unclaimed NFT
    pub tokens_per_nft: u64,

    /// Token cap shown next to the total supply
    pub max_supply: u64,

    /// Interval between receipt polls while a transaction is pending
    pub receipt_poll_interval_ms: u32,
}

impl Default for IcoConfig {
    fn default() -> Self {
        Self {
            chain_id: 4,
            network_name: "Rinkeby".to_string(),
            nft_contract: Address::ZERO,
            token_contract: Address::ZERO,
            // 0.001 ether
            unit_price_wei: U256::from(1_000_000_000_000_000u64),
            tokens_per_nft: 10,
            max_supply: 10_000,
            receipt_poll_interval_ms: 1_000,
        }
    }
}

impl IcoConfig {
    /// Build a configuration from a key lookup, falling back to the defaults.
    ///
    /// The result is not validated; call [`IcoConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("ICO_CHAIN_ID") {
            config.chain_id = parse_var("ICO_CHAIN_ID", &value)?;
        }
        if let Some(value) = lookup("ICO_NETWORK_NAME") {
            config.network_name = value;
        }
        if let Some(value) = lookup("ICO_NFT_CONTRACT") {
            config.nft_contract = parse_var("ICO_NFT_CONTRACT", &value)?;
        }
        if let Some(value) = lookup("ICO_TOKEN_CONTRACT") {
            config.token_contract = parse_var("ICO_TOKEN_CONTRACT", &value)?;
        }
        if let Some(value) = lookup("ICO_UNIT_PRICE") {
            config.unit_price_wei = shared::utils::parse_ether(&value)
                .map_err(|e| format!("ICO_UNIT_PRICE must be an ether amount: {}", e))?;
        }
        if let Some(value) = lookup("ICO_TOKENS_PER_NFT") {
            config.tokens_per_nft = parse_var("ICO_TOKENS_PER_NFT", &value)?;
        }
        if let Some(value) = lookup("ICO_MAX_SUPPLY") {
            config.max_supply = parse_var("ICO_MAX_SUPPLY", &value)?;
        }
        if let Some(value) = lookup("ICO_RECEIPT_POLL_MS") {
            config.receipt_poll_interval_ms = parse_var("ICO_RECEIPT_POLL_MS", &value)?;
        }

        Ok(config)
    }

    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from variables captured when the crate was compiled.
    pub fn from_build_env() -> Result<Self, String> {
        Self::from_lookup(|key| {
            let value = match key {
                "ICO_CHAIN_ID" => option_env!("ICO_CHAIN_ID"),
                "ICO_NETWORK_NAME" => option_env!("ICO_NETWORK_NAME"),
                "ICO_NFT_CONTRACT" => option_env!("ICO_NFT_CONTRACT"),
                "ICO_TOKEN_CONTRACT" => option_env!("ICO_TOKEN_CONTRACT"),
                "ICO_UNIT_PRICE" => option_env!("ICO_UNIT_PRICE"),
                "ICO_TOKENS_PER_NFT" => option_env!("ICO_TOKENS_PER_NFT"),
                "ICO_MAX_SUPPLY" => option_env!("ICO_MAX_SUPPLY"),
                "ICO_RECEIPT_POLL_MS" => option_env!("ICO_RECEIPT_POLL_MS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.chain_id == 0 {
            return Err("ICO_CHAIN_ID must be non-zero".to_string());
        }
        if self.nft_contract == Address::ZERO {
            return Err("ICO_NFT_CONTRACT must be set to the NFT collection address".to_string());
        }
        if self.token_contract == Address::ZERO {
            return Err("ICO_TOKEN_CONTRACT must be set to the token contract address".to_string());
        }
        if self.nft_contract == self.token_contract {
            return Err("ICO_NFT_CONTRACT and ICO_TOKEN_CONTRACT must differ".to_string());
        }
        if self.unit_price_wei.is_zero() {
            return Err("ICO_UNIT_PRICE must be greater than zero".to_string());
        }
        if self.tokens_per_nft == 0 {
            return Err("ICO_TOKENS_PER_NFT must be greater than zero".to_string());
        }
        if self.max_supply == 0 {
            return Err("ICO_MAX_SUPPLY must be greater than zero".to_string());
        }
        if self.receipt_poll_interval_ms < 100 {
            return Err("ICO_RECEIPT_POLL_MS must be at least 100".to_string());
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| format!("{} has an invalid value '{}': {}", name, value, e))
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<IcoConfig> = OnceLock::new();

/// Validate and install the global configuration.
///
/// # Errors
///
/// Returns an error if validation fails or the config has already been initialized.
pub fn init_config(config: IcoConfig) -> Result<(), String> {
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static IcoConfig {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}
