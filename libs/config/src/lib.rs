//! # Pair Configuration
//!
//! Centralized constants and pool-creation configuration for the pair engine.
//!
//! ## Features
//!
//! - **Protocol Constants**: minimum liquidity lock, fixed-point precision,
//!   fee denominator, stable-curve solver bounds, EIP-712 type strings
//! - **Pair Configuration**: fee tiers per curve variant, oracle window and
//!   granularity, permit chain id; loaded from TOML with environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use pair_config::{protocol, PairConfig};
//!
//! let config = PairConfig::default();
//! assert_eq!(config.fee_bps(true), 2);
//! assert_eq!(config.oracle.period_size(), 7_200);
//! assert_eq!(protocol::MINIMUM_LIQUIDITY, 1_000);
//! ```

pub mod pair_config;
pub mod protocol;

pub use pair_config::{load_config, FeeSettings, OracleSettings, PairConfig, PermitSettings};
