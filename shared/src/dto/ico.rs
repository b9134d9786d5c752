use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// On-chain figures shown on the ICO page.
///
/// Every field is rederived from the contracts on each refresh; a field whose
/// read failed is reported as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcoStats {
    /// Owned NFTs whose claim flag is still false
    pub claimable: u64,
    /// Crypto Dev Token balance of the connected account, in wei
    pub token_balance: U256,
    /// Token total supply, in wei
    pub total_minted: U256,
}
