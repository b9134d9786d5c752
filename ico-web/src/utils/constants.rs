//! Application constants

// Page copy
pub const PAGE_TITLE: &str = "Welcome to Crypto Devs ICO!";
pub const PAGE_SUBTITLE: &str = "You can claim or mint Crypto Dev tokens here";
pub const FOOTER_TEXT: &str = "Made with \u{2764} by Crypto Devs";

// Assets
pub const HERO_IMAGE: &str = "./0.svg";

// Wallet
pub const INSTALL_WALLET_URL: &str = "https://metamask.io/download/";

// Mint input
pub const MINT_PLACEHOLDER: &str = "Amount of Tokens";
