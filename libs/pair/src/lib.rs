//! # Pair Engine - Two-Asset Pooled Liquidity
//!
//! ## Purpose
//!
//! Exchange engine of a single AMM pair: prices trades on a constant-product
//! or a low-slippage stable curve, mints and burns pool shares against
//! deposits, streams a time-weighted reserve feed, and distributes trading
//! fees to share holders through lazily synchronized reward indices.
//!
//! ## Integration Points
//!
//! - **Host ledger**: asset balances, metadata and the clock come through the
//!   [`Host`] trait; [`MemoryHost`] backs tests and simulations
//! - **Registry**: pairs are created from [`PairParams`] plus a
//!   [`pair_config::PairConfig`] that fixes fee tier and oracle geometry
//! - **Fee collector**: swap fees are moved to the collector address and
//!   pulled into the reward indices on mint, burn and claim
//! - **Consumers**: [`PairEvent`] log drained with [`Pair::take_events`]
//!
//! ## Architecture Role
//!
//! ```text
//! caller -> Pair entry point -> ReentrancyGuard
//!                 |-> FeeDistribution (sync holders, pull fees)
//!                 |-> Curve (quote / K check)
//!                 |-> ReserveLedger -> Oracle ring
//!                 '-> Host (balances, transfers, checkpoint/rollback)
//! ```
//!
//! ## Precision
//!
//! All amounts are `U256`; arithmetic that would overflow fails with
//! [`PairError::Overflow`]. The stable curve uses 1e18 fixed point with an
//! integer Newton solver, so quotes are bit-identical on every platform.
//!
//! ## Example
//!
//! ```
//! use ethers_core::types::{Address, U256};
//! use pair_config::PairConfig;
//! use pair_engine::{MemoryHost, Pair, PairParams};
//!
//! let (usdc, weth) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! let (pool, lp) = (Address::repeat_byte(0xaa), Address::repeat_byte(0x11));
//!
//! let mut host = MemoryHost::new(1_700_000_000);
//! host.register_asset(usdc, "USDC", 6);
//! host.register_asset(weth, "WETH", 18);
//!
//! let params = PairParams {
//!     address: pool,
//!     token_a: usdc,
//!     token_b: weth,
//!     stable: false,
//!     fees_address: Address::repeat_byte(0xfe),
//! };
//! let mut pair = Pair::new(&host, params, &PairConfig::default()).unwrap();
//!
//! host.mint(usdc, pool, U256::exp10(12)).unwrap();
//! host.mint(weth, pool, U256::exp10(20)).unwrap();
//! let shares = pair.mint(&mut host, lp).unwrap();
//! assert_eq!(pair.balance_of(lp), shares);
//! ```

pub mod collector;
pub mod curve;
pub mod error;
pub mod events;
pub mod guard;
pub mod host;
pub mod oracle;
pub mod pair;
pub mod permit;
pub mod reserves;
pub mod rewards;
pub mod shares;

mod math;

pub use collector::FeeCollector;
pub use curve::{amount_after_fee, fee_amount, Curve};
pub use error::{PairError, Result};
pub use events::PairEvent;
pub use guard::ReentrancyGuard;
pub use host::{Host, MemoryCheckpoint, MemoryHost};
pub use oracle::{Observation, Oracle};
pub use pair::{Pair, PairMetadata, PairParams, SwapCallback, SwapCallee, SwapStage};
pub use permit::{domain_separator, permit_digest, recover_signer, PermitMessage};
pub use reserves::ReserveLedger;
pub use rewards::{AccountRewards, FeeDistribution};
pub use shares::ShareLedger;
