//! # Shared Types and Display Utilities
//!
//! This library defines the values that travel between the ICO core (`lib-core`)
//! and the browser frontend (`ico-web`), plus the formatting helpers both sides use
//! to show them.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::ico`]**: On-chain ICO figures for the connected account
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::format_ether`]** / **[`utils::parse_ether`]**: Convert between wei and ether strings
//!
//! ## Usage
//!
//! ```rust
//! use alloy_primitives::U256;
//! use shared::dto::ico::IcoStats;
//! use shared::utils::format_ether;
//!
//! let stats = IcoStats {
//!     claimable: 2,
//!     token_balance: U256::from(1_500_000_000_000_000_000u128),
//!     total_minted: U256::ZERO,
//! };
//! assert_eq!(format_ether(stats.token_balance), "1.5");
//! assert_eq!(format_ether(stats.total_minted), "0.0");
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
