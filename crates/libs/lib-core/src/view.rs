//! # View Renderer
//!
//! Pure mapping from page state to what the page shows. The browser crate turns
//! an [`IcoView`] into markup; everything that decides *which* view is here so it
//! can be tested without a DOM.
//!
//! Precedence: disconnected, then loading, then claim, then mint.

use serde::{Deserialize, Serialize};

use crate::config::IcoConfig;
use shared::dto::ico::IcoStats;
use shared::utils::format_ether;

/// Inputs the view depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewInput {
    pub connected: bool,
    pub pending: bool,
    pub claimable: u64,
    pub mint_amount: u64,
}

/// The action area of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum IcoView {
    /// Connect-wallet prompt
    Disconnected,
    /// A mint or claim is waiting for confirmation
    Loading,
    /// Unclaimed NFTs: show the claim button
    Claim {
        claimable_nfts: u64,
        claimable_tokens: u64,
    },
    /// Amount input and mint button
    Mint { can_submit: bool },
}

pub fn render(input: &ViewInput, config: &IcoConfig) -> IcoView {
    if !input.connected {
        return IcoView::Disconnected;
    }
    if input.pending {
        return IcoView::Loading;
    }
    if input.claimable > 0 {
        return IcoView::Claim {
            claimable_nfts: input.claimable,
            claimable_tokens: input.claimable.saturating_mul(config.tokens_per_nft),
        };
    }
    IcoView::Mint {
        can_submit: input.mint_amount > 0,
    }
}

/// Header lines shown while connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Token balance of the account, formatted in whole tokens
    pub minted_by_you: String,
    /// Token total supply, formatted in whole tokens
    pub total_minted: String,
    pub max_supply: u64,
}

impl Summary {
    pub fn minted_line(&self) -> String {
        format!("You have minted {} Crypto Dev Tokens", self.minted_by_you)
    }

    pub fn overall_line(&self) -> String {
        format!(
            "Overall {}/{} have been minted",
            self.total_minted, self.max_supply
        )
    }
}

pub fn summary(stats: &IcoStats, config: &IcoConfig) -> Summary {
    Summary {
        minted_by_you: format_ether(stats.token_balance),
        total_minted: format_ether(stats.total_minted),
        max_supply: config.max_supply,
    }
}

/// Amount typed into the mint input; anything that is not a whole number is 0.
pub fn parse_mint_amount(input: &str) -> u64 {
    input.trim().parse().unwrap_or(0)
}

/// Text for a freshly built mint input, so the field shows what a submit would send.
pub fn mint_input_value(amount: u64) -> String {
    if amount == 0 {
        String::new()
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    fn connected() -> ViewInput {
        ViewInput {
            connected: true,
            ..ViewInput::default()
        }
    }

    #[test]
    fn test_disconnected_wins() {
        let input = ViewInput {
            connected: false,
            pending: true,
            claimable: 3,
            mint_amount: 1,
        };
        assert_eq!(render(&input, &IcoConfig::default()), IcoView::Disconnected);
    }

    #[test]
    fn test_pending_beats_claim() {
        let input = ViewInput {
            pending: true,
            claimable: 2,
            ..connected()
        };
        assert_eq!(render(&input, &IcoConfig::default()), IcoView::Loading);
    }

    #[test]
    fn test_claim_pays_per_nft() {
        let input = ViewInput {
            claimable: 2,
            mint_amount: 4,
            ..connected()
        };
        assert_eq!(
            render(&input, &IcoConfig::default()),
            IcoView::Claim {
                claimable_nfts: 2,
                claimable_tokens: 20
            }
        );
    }

    #[test]
    fn test_mint_enabled_only_for_positive_amount() {
        let config = IcoConfig::default();
        assert_eq!(
            render(&connected(), &config),
            IcoView::Mint { can_submit: false }
        );
        let input = ViewInput {
            mint_amount: 1,
            ..connected()
        };
        assert_eq!(render(&input, &config), IcoView::Mint { can_submit: true });
    }

    #[test]
    fn test_parse_mint_amount() {
        assert_eq!(parse_mint_amount("5"), 5);
        assert_eq!(parse_mint_amount(" 12 "), 12);
        assert_eq!(parse_mint_amount(""), 0);
        assert_eq!(parse_mint_amount("-3"), 0);
        assert_eq!(parse_mint_amount("abc"), 0);
        assert_eq!(parse_mint_amount("1.5"), 0);
    }

    #[test]
    fn test_rebuilt_mint_input_matches_submit_state() {
        // An empty field never enables the mint button
        assert_eq!(mint_input_value(0), "");
        let input = ViewInput {
            mint_amount: parse_mint_amount(&mint_input_value(0)),
            ..connected()
        };
        assert_eq!(
            render(&input, &IcoConfig::default()),
            IcoView::Mint { can_submit: false }
        );

        assert_eq!(mint_input_value(7), "7");
        assert_eq!(parse_mint_amount(&mint_input_value(7)), 7);
    }

    #[test]
    fn test_summary_lines() {
        let stats = IcoStats {
            claimable: 0,
            token_balance: U256::from(1_500_000_000_000_000_000u64),
            total_minted: U256::ZERO,
        };
        let summary = summary(&stats, &IcoConfig::default());
        assert_eq!(summary.minted_line(), "You have minted 1.5 Crypto Dev Tokens");
        assert_eq!(summary.overall_line(), "Overall 0.0/10000 have been minted");
    }

    #[test]
    fn test_view_serializes_tagged() {
        let json = serde_json::to_value(IcoView::Claim {
            claimable_nfts: 1,
            claimable_tokens: 10,
        })
        .unwrap();
        assert_eq!(json["view"], "claim");
        assert_eq!(json["claimable_tokens"], 10);
    }
}
