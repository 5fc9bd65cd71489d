//! Pair error taxonomy
//!
//! Every failure is synchronous and aborts the whole invocation; guarded
//! entry points roll back pool state and host balances before returning one
//! of these.

use ethers_core::types::{Address, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    // Validation errors
    #[error("no zero trade: both requested output amounts are zero")]
    ZeroTrade,

    #[error("insufficient liquidity for the requested output")]
    InsufficientLiquidity,

    #[error("invalid receiver {0:?}: receiver is a pooled asset")]
    InvalidReceiver(Address),

    #[error("insufficient amount in")]
    InsufficientInputAmount,

    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    #[error("permit expired: deadline {deadline} is before {now}")]
    Expired { deadline: U256, now: u64 },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("insufficient allowance: {allowance} < {amount}")]
    InsufficientAllowance { allowance: U256, amount: U256 },

    #[error("insufficient balance for {holder:?}: {balance} < {amount}")]
    InsufficientBalance {
        holder: Address,
        balance: U256,
        amount: U256,
    },

    #[error("asset {0:?} is not part of this pair")]
    InvalidToken(Address),

    // Invariant errors
    #[error("K invariant violated: {after} < {before}")]
    KInvariant { before: U256, after: U256 },

    // Concurrency errors
    #[error("re-entrancy detected")]
    Reentrancy,

    // State errors
    #[error("missing observation for the requested window")]
    MissingObservation,

    // Creation errors
    #[error("identical addresses")]
    IdenticalAddresses,

    #[error("zero address")]
    ZeroAddress,

    #[error("unknown asset {0:?}")]
    UnknownAsset(Address),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("arithmetic overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, PairError>;
