//! Invariant engine: constant-product and stable pricing curves
//!
//! Pure functions with no state. Both variants answer the same two questions:
//! how much output does a (fee-deducted) input buy against given reserves, and
//! what is the invariant `k` of a reserve pair.
//!
//! - **Volatile**: `k = x * y`, closed-form output
//!   `y * dx / (x + dx)`.
//! - **Stable**: `k = x'^3 * y' + y'^3 * x'` over decimal-normalized 1e18
//!   fixed-point quantities. The output has no closed form and is solved with
//!   an integer Newton iteration (at most [`MAX_ITERATIONS`] steps, converged
//!   when successive iterates differ by at most one unit). The result is then
//!   nudged up onto the curve until `k(x0, y) >= k_before`, so a quoted output
//!   always passes the post-swap invariant check.
//!
//! No floating point anywhere: results are bit-identical on every platform.

use crate::error::Result;
use crate::math::{add, div, mul, mul_div, precision, sub};
use ethers_core::types::U256;
use pair_config::protocol::solver::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS};
use pair_config::protocol::FEE_DENOMINATOR;
use serde::{Deserialize, Serialize};

/// Pricing curve of a pair, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Curve {
    /// `x * y = k`
    Volatile,
    /// `x^3 y + y^3 x = k` on quantities divided by `10^decimals`
    Stable { scale0: U256, scale1: U256 },
}

/// Fee charged on `amount` at `fee_bps`
pub fn fee_amount(amount: U256, fee_bps: u64) -> Result<U256> {
    mul_div(amount, U256::from(fee_bps), U256::from(FEE_DENOMINATOR))
}

/// `amount` with the swap fee deducted
pub fn amount_after_fee(amount: U256, fee_bps: u64) -> Result<U256> {
    sub(amount, fee_amount(amount, fee_bps)?)
}

impl Curve {
    pub fn is_stable(&self) -> bool {
        matches!(self, Curve::Stable { .. })
    }

    /// Invariant value of a reserve pair
    ///
    /// Stable pairs compare decimal-normalized quantities so that a 6-decimal
    /// and an 18-decimal asset price at parity.
    pub fn k(&self, reserve0: U256, reserve1: U256) -> Result<U256> {
        match *self {
            Curve::Volatile => mul(reserve0, reserve1),
            Curve::Stable { scale0, scale1 } => {
                let x = normalize(reserve0, scale0)?;
                let y = normalize(reserve1, scale1)?;
                stable_k(x, y)
            }
        }
    }

    /// Output bought by `amount_in` (already fee-deducted)
    ///
    /// `zero_for_one` selects the direction: asset 0 in, asset 1 out.
    /// Zero input or an empty side quotes zero instead of failing.
    pub fn amount_out(
        &self,
        amount_in: U256,
        zero_for_one: bool,
        reserve0: U256,
        reserve1: U256,
    ) -> Result<U256> {
        if amount_in.is_zero() || reserve0.is_zero() || reserve1.is_zero() {
            return Ok(U256::zero());
        }

        match *self {
            Curve::Volatile => {
                let (reserve_in, reserve_out) = if zero_for_one {
                    (reserve0, reserve1)
                } else {
                    (reserve1, reserve0)
                };
                mul_div(amount_in, reserve_out, add(reserve_in, amount_in)?)
            }
            Curve::Stable { scale0, scale1 } => {
                // Recomputed from the reserves on every call; never cached
                let xy = self.k(reserve0, reserve1)?;

                let r0 = normalize(reserve0, scale0)?;
                let r1 = normalize(reserve1, scale1)?;
                let (reserve_in, reserve_out, scale_in, scale_out) = if zero_for_one {
                    (r0, r1, scale0, scale1)
                } else {
                    (r1, r0, scale1, scale0)
                };

                let x0 = add(normalize(amount_in, scale_in)?, reserve_in)?;
                let y = solve_y(x0, xy, reserve_out)?;
                let out = reserve_out.saturating_sub(y);
                mul_div(out, scale_out, precision())
            }
        }
    }
}

/// Quantity expressed in 1e18 fixed point of whole units
fn normalize(amount: U256, scale: U256) -> Result<U256> {
    mul_div(amount, precision(), scale)
}

/// `x * y * (x^2 + y^2)` in 1e18 fixed point
fn stable_k(x: U256, y: U256) -> Result<U256> {
    let one = precision();
    let a = mul_div(x, y, one)?;
    let b = add(mul_div(x, x, one)?, mul_div(y, y, one)?)?;
    mul_div(a, b, one)
}

/// `x0 * y^3 + x0^3 * y`, the form the Newton step differentiates
fn curve_f(x0: U256, y: U256) -> Result<U256> {
    let one = precision();
    let y3 = mul_div(mul_div(y, y, one)?, y, one)?;
    let x3 = mul_div(mul_div(x0, x0, one)?, x0, one)?;
    add(mul_div(x0, y3, one)?, mul_div(x3, y, one)?)
}

/// `df/dy = 3 * x0 * y^2 + x0^3`
fn curve_d(x0: U256, y: U256) -> Result<U256> {
    let one = precision();
    let y2 = mul_div(y, y, one)?;
    let x3 = mul_div(mul_div(x0, x0, one)?, x0, one)?;
    add(mul_div(mul(U256::from(3), x0)?, y2, one)?, x3)
}

/// Solve `f(x0, y) = xy` for `y`, starting from `y`
fn solve_y(x0: U256, xy: U256, mut y: U256) -> Result<U256> {
    let one = precision();
    let tolerance = U256::from(CONVERGENCE_TOLERANCE);

    for _ in 0..MAX_ITERATIONS {
        let previous = y;
        let k = curve_f(x0, y)?;
        let slope = curve_d(x0, y)?;
        if slope.is_zero() {
            break;
        }

        if k < xy {
            y = add(y, div(mul(xy - k, one)?, slope)?)?;
        } else {
            y = y.saturating_sub(div(mul(k - xy, one)?, slope)?);
        }

        let step = if y > previous { y - previous } else { previous - y };
        if step <= tolerance {
            break;
        }
    }

    // Round toward the pool: the quoted point must not sit below the curve
    for _ in 0..MAX_ITERATIONS {
        if stable_k(x0, y)? >= xy {
            break;
        }
        y = add(y, U256::one())?;
    }

    Ok(y)
}
