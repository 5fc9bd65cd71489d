//! Events emitted by pair state changes
//!
//! Appended to the pair's log as they happen; a failed call discards the
//! events it produced together with the rest of its state.

use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairEvent {
    Mint {
        to: Address,
        amount0: U256,
        amount1: U256,
        liquidity: U256,
    },
    Burn {
        to: Address,
        amount0: U256,
        amount1: U256,
        liquidity: U256,
    },
    Swap {
        sender: Address,
        amount0_in: U256,
        amount1_in: U256,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    },
    Sync {
        reserve0: U256,
        reserve1: U256,
    },
    /// Swap fees routed to the collector
    Fees {
        sender: Address,
        amount0: U256,
        amount1: U256,
    },
    Claim {
        recipient: Address,
        amount0: U256,
        amount1: U256,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: U256,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: U256,
    },
}
