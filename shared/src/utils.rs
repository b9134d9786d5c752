//! # Shared Utility Functions
//!
//! Common utility functions used by the ICO core and the web frontend.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `0x` prefix plus four characters on each side
//!
//! ## Token Amounts
//!
//! Token and ether amounts are carried as `U256` in the smallest unit (wei, 18
//! decimals). Conversion to and from decimal strings is exact; no floating point
//! is involved.
//!
//! - [`format_units`] / [`format_ether`] - `U256` to decimal string, trailing zeros trimmed
//! - [`parse_units`] / [`parse_ether`] - decimal string to `U256`
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::{format_address, format_ether, parse_ether};
//!
//! let address = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
//! assert_eq!(format_address(address, 6, 4), "0x5B38...ddC4");
//!
//! let price = parse_ether("0.001").unwrap();
//! assert_eq!(format_ether(price), "0.001");
//! ```

use alloy_primitives::utils::{self as units, ParseUnits};
use alloy_primitives::U256;

/// Decimals of ether and of the Crypto Dev Token.
pub const ETHER_DECIMALS: u8 = 18;

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
/// assert_eq!(format_address(addr, 6, 4), "0x5B38...ddC4");
/// assert_eq!(format_address("short", 4, 4), "short");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
    {
        return address.to_string();
    }

    // Hex addresses are ASCII-only, byte indexing is safe
    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format a wallet address as `0x` plus four characters on each side.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
/// assert_eq!(truncate_address(addr), "0x5B38...ddC4");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Format an integer amount of the smallest unit as a decimal string.
///
/// Trailing zeros of the fractional part are trimmed, keeping at least one digit,
/// so whole values render as `"1.0"`.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use shared::utils::format_units;
///
/// assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
/// assert_eq!(format_units(U256::from(42u64), 0), "42");
/// ```
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let base = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / base;
    let fraction = value % base;

    let mut fraction_digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    while fraction_digits.len() > 1 && fraction_digits.ends_with('0') {
        fraction_digits.pop();
    }

    format!("{}.{}", whole, fraction_digits)
}

/// Format a wei amount as ether.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use shared::utils::format_ether;
///
/// assert_eq!(format_ether(U256::ZERO), "0.0");
/// assert_eq!(format_ether(U256::from(5_000_000_000_000_000u64)), "0.005");
/// ```
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// Parse a non-negative decimal string into an integer amount of the smallest unit.
///
/// Accepts `"12"`, `"12.5"`, `".5"` and `"12."`. Rejects signs, exponents, empty input
/// and more fractional digits than `decimals`; the conversion itself is
/// [`alloy_primitives::utils::parse_units`].
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use shared::utils::parse_units;
///
/// assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
/// assert!(parse_units("1.5", 0).is_err());
/// ```
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, String> {
    let input = input.trim();
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("'{}' is not a number", input));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a non-negative decimal number", input));
    }
    // alloy truncates extra digits instead of rejecting them
    if fraction.len() > decimals as usize {
        return Err(format!(
            "'{}' has more than {} fractional digits",
            input, decimals
        ));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    match units::parse_units(&normalized, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(format!("'{}' is negative", input)),
        Err(e) => Err(format!("'{}' is out of range: {}", input, e)),
    }
}

/// Parse an ether amount into wei.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use shared::utils::parse_ether;
///
/// assert_eq!(parse_ether("0.001").unwrap(), U256::from(1_000_000_000_000_000u64));
/// ```
pub fn parse_ether(input: &str) -> Result<U256, String> {
    parse_units(input, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(ADDR, 6, 4), "0x5B38...ddC4");
        assert_eq!(format_address(ADDR, 4, 4), "0x5B...ddC4");
        assert_eq!(format_address(ADDR, 2, 2), "0x...C4");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("abc", 4, 4), "abc");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDR), "0x5B38...ddC4");
    }

    #[test]
    fn test_format_ether_matches_ethers_style() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(U256::from(10u64).pow(U256::from(18u64))), "1.0");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(format_ether(U256::from(5_000_000_000_000_000u64)), "0.005");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn test_format_ether_large_supply() {
        // 10000 tokens with 18 decimals
        let supply = U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_ether(supply), "10000.0");
    }

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("0.001").unwrap(), U256::from(1_000_000_000_000_000u64));
        assert_eq!(parse_ether("1").unwrap(), U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(parse_ether(".5").unwrap(), U256::from(500_000_000_000_000_000u128));
        assert_eq!(parse_ether("2.").unwrap(), U256::from(2_000_000_000_000_000_000u128));
        assert_eq!(parse_ether("0").unwrap(), U256::ZERO);
        assert_eq!(parse_ether("0.0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_ether_rejects_invalid() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("1e18").is_err());
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_parse_then_format_is_stable() {
        for input in ["0.001", "0.005", "12.25", "10000.0"] {
            assert_eq!(format_ether(parse_ether(input).unwrap()), input);
        }
    }
}
