//! Contract ABIs the ICO page talks to.
//!
//! Only the functions the page calls are declared. Both contracts expose a
//! `balanceOf(address)`, so each lives in its own interface module.

use alloy_sol_types::sol;

sol! {
    /// Crypto Devs NFT collection (ERC-721 enumerable subset).
    interface ICryptoDevs {
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
    }

    /// Crypto Dev Token (ERC-20 with paid mint and per-NFT claim).
    interface ICryptoDevToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function tokenIdsClaimed(uint256 tokenId) external view returns (bool);
        function mint(uint256 amount) external payable;
        function claim() external;
    }
}
