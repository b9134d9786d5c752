//! # Data Transfer Objects (DTOs)
//!
//! Plain values handed from the core to the view layer.
//!
//! ## Module Organization
//!
//! - [`ico`] - Claimable count, token balance and total supply for the connected account
//!
//! ## Serialization Format
//!
//! All DTOs derive `Serialize`/`Deserialize`:
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Token amounts**: `U256` in wei, serialized as `0x`-prefixed hex strings
//!
//! ```text
//! {
//!   "claimable": 2,
//!   "token_balance": "0x14d1120d7b160000",
//!   "total_minted": "0x0"
//! }
//! ```

pub mod ico;

pub use ico::*;
