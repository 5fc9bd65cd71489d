//! Protocol constants
//!
//! Fixed parameters of the pair engine. Unlike [`PairConfig`](crate::PairConfig)
//! these never vary between deployments.

/// Shares permanently locked to the null holder on the first mint
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Fixed-point scale for reward indices and the stable curve (1e18)
pub const PRECISION: u64 = 1_000_000_000_000_000_000;

/// Denominator for fee rates expressed in basis points
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Upper bound accepted for any configured swap fee (5%)
pub const MAX_FEE_BPS: u64 = 500;

/// Largest asset decimals whose 10^decimals scalar fits in 256 bits
pub const MAX_ASSET_DECIMALS: u8 = 77;

/// Stable-curve Newton solver bounds
pub mod solver {
    /// Iteration cap for the stable-curve inverse
    pub const MAX_ITERATIONS: usize = 64;

    /// Successive iterates within this distance are considered converged
    pub const CONVERGENCE_TOLERANCE: u64 = 1;
}

/// Pool-share token metadata
pub mod share_token {
    /// Pool shares are 18-decimal claims
    pub const DECIMALS: u8 = 18;

    pub const STABLE_NAME_PREFIX: &str = "StableV1 AMM";
    pub const VOLATILE_NAME_PREFIX: &str = "VolatileV1 AMM";
    pub const STABLE_SYMBOL_PREFIX: &str = "sAMM";
    pub const VOLATILE_SYMBOL_PREFIX: &str = "vAMM";
}

/// EIP-712 signature-based approval
pub mod permit {
    pub const DOMAIN_TYPE: &str =
        "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

    pub const PERMIT_TYPE: &str =
        "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

    pub const DOMAIN_VERSION: &str = "1";
}
