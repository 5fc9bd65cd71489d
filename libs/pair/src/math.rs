//! Checked 256-bit helpers
//!
//! Anything an EVM program would revert on surfaces as [`PairError::Overflow`].

use crate::error::{PairError, Result};
use ethers_core::types::U256;
use pair_config::protocol::PRECISION;

/// 1e18 as a 256-bit value
pub(crate) fn precision() -> U256 {
    U256::from(PRECISION)
}

pub(crate) fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(PairError::Overflow)
}

pub(crate) fn sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or(PairError::Overflow)
}

pub(crate) fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(PairError::Overflow)
}

/// Floor division; a zero divisor is an error
pub(crate) fn div(a: U256, b: U256) -> Result<U256> {
    a.checked_div(b).ok_or(PairError::Overflow)
}

/// `a * b / c` with the intermediate product checked
pub(crate) fn mul_div(a: U256, b: U256, c: U256) -> Result<U256> {
    div(mul(a, b)?, c)
}
