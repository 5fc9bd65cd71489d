//! Swap and flash-swap executor
//!
//! Outputs are sent before payment is checked, which is what makes flash
//! swaps possible. The K comparison at the end is the only gate: whatever the
//! callback does, the call fails unless the pair ends up holding enough input
//! to keep the curve invariant after fees.
//!
//! ```text
//! Idle -> Validating -> OptimisticTransfer -> [Callback] -> InvariantCheck -> Settled
//! ```

use super::Pair;
use crate::curve::fee_amount;
use crate::error::{PairError, Result};
use crate::events::PairEvent;
use crate::host::Host;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Progress of the swap currently executing on a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapStage {
    Idle,
    Validating,
    OptimisticTransfer,
    Callback,
    InvariantCheck,
    Settled,
}

/// Receiver-side hook invoked mid-swap with the borrowed amounts
///
/// The hook gets the pair back so it can read it or attempt nested calls;
/// every guarded entry point rejects those while the swap is in progress.
pub trait SwapCallee<H: Host> {
    fn hook(
        &mut self,
        pair: &mut Pair,
        host: &mut H,
        sender: Address,
        amount0_out: U256,
        amount1_out: U256,
        data: &[u8],
    ) -> Result<()>;
}

/// Flash-swap request: the callee to invoke and the opaque data it receives
pub struct SwapCallback<'a, H: Host> {
    pub callee: &'a mut dyn SwapCallee<H>,
    pub data: &'a [u8],
}

impl Pair {
    /// Send `amount0_out` / `amount1_out` to `to`, then require payment
    ///
    /// Payment is whatever the pair's balances grew by beyond the recorded
    /// reserves minus the outputs, either pushed beforehand or repaid by the
    /// callback.
    pub fn swap<H: Host>(
        &mut self,
        host: &mut H,
        sender: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        callback: Option<SwapCallback<'_, H>>,
    ) -> Result<()> {
        self.guarded(host, "swap", move |pair, host| {
            pair.swap_inner(host, sender, amount0_out, amount1_out, to, callback)
        })
    }

    fn swap_inner<H: Host>(
        &mut self,
        host: &mut H,
        sender: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        callback: Option<SwapCallback<'_, H>>,
    ) -> Result<()> {
        self.stage = SwapStage::Validating;
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(PairError::ZeroTrade);
        }
        let (reserve0, reserve1, _) = self.get_reserves();
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(PairError::InsufficientLiquidity);
        }
        let (token0, token1) = self.tokens();
        if to == token0 || to == token1 {
            return Err(PairError::InvalidReceiver(to));
        }

        self.stage = SwapStage::OptimisticTransfer;
        let pair_address = self.meta.address;
        if !amount0_out.is_zero() {
            host.transfer(token0, pair_address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            host.transfer(token1, pair_address, to, amount1_out)?;
        }

        if let Some(SwapCallback { callee, data }) = callback {
            self.stage = SwapStage::Callback;
            callee.hook(self, host, sender, amount0_out, amount1_out, data)?;
        }

        self.stage = SwapStage::InvariantCheck;
        let (balance0, balance1) = self.balances(host);
        let amount0_in = balance0.saturating_sub(reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(PairError::InsufficientInputAmount);
        }

        self.route_fees(host, sender, amount0_in, amount1_in)?;

        // Balances net of fees, since the fees already left for the collector
        let (balance0, balance1) = self.balances(host);
        let before = self.meta.curve.k(reserve0, reserve1)?;
        let after = self.meta.curve.k(balance0, balance1)?;
        if after < before {
            return Err(PairError::KInvariant { before, after });
        }

        self.stage = SwapStage::Settled;
        self.update(host, balance0, balance1);
        self.emit(PairEvent::Swap {
            sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        debug!(
            "Swap on {:?}: in {} / {}, out {} / {}, to {:?}",
            pair_address, amount0_in, amount1_in, amount0_out, amount1_out, to
        );
        Ok(())
    }

    /// Move the fee share of each input to the collector
    fn route_fees<H: Host>(
        &mut self,
        host: &mut H,
        sender: Address,
        amount0_in: U256,
        amount1_in: U256,
    ) -> Result<()> {
        let fee0 = fee_amount(amount0_in, self.meta.fee_bps)?;
        let fee1 = fee_amount(amount1_in, self.meta.fee_bps)?;
        let collector = self.state.collector.address();

        if !fee0.is_zero() {
            host.transfer(self.meta.token0, self.meta.address, collector, fee0)?;
            self.state.collector.route(true, fee0)?;
        }
        if !fee1.is_zero() {
            host.transfer(self.meta.token1, self.meta.address, collector, fee1)?;
            self.state.collector.route(false, fee1)?;
        }

        if !fee0.is_zero() || !fee1.is_zero() {
            self.emit(PairEvent::Fees {
                sender,
                amount0: fee0,
                amount1: fee1,
            });
        }
        Ok(())
    }
}
