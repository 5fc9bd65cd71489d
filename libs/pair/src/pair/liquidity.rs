//! Liquidity entry points: mint, burn, skim, sync
//!
//! Assets are pushed to the pair address before `mint`; shares are pushed to
//! the pair address before `burn`. Both reconcile against the recorded
//! reserves and pull pending fees into the reward indices first.

use super::Pair;
use crate::error::{PairError, Result};
use crate::events::PairEvent;
use crate::host::Host;
use crate::math::{mul, mul_div};
use ethers_core::types::{Address, U256};
use pair_config::protocol::MINIMUM_LIQUIDITY;
use tracing::info;

impl Pair {
    /// Mint shares to `to` for the assets deposited since the last sync
    pub fn mint<H: Host>(&mut self, host: &mut H, to: Address) -> Result<U256> {
        self.guarded(host, "mint", |pair, host| pair.mint_inner(host, to))
    }

    fn mint_inner<H: Host>(&mut self, host: &mut H, to: Address) -> Result<U256> {
        self.pull_fees()?;

        let (reserve0, reserve1, _) = self.get_reserves();
        let (balance0, balance1) = self.balances(host);
        let amount0 = balance0
            .checked_sub(reserve0)
            .ok_or(PairError::InsufficientLiquidityMinted)?;
        let amount1 = balance1
            .checked_sub(reserve1)
            .ok_or(PairError::InsufficientLiquidityMinted)?;

        let total_supply = self.state.shares.total_supply();
        let liquidity = if total_supply.is_zero() {
            let minimum = U256::from(MINIMUM_LIQUIDITY);
            let root = mul(amount0, amount1)?.integer_sqrt();
            if root <= minimum {
                return Err(PairError::InsufficientLiquidityMinted);
            }

            // Locked forever with the null holder
            self.sync_holder(Address::zero())?;
            self.state.shares.mint(Address::zero(), minimum)?;
            self.emit(PairEvent::Transfer {
                from: Address::zero(),
                to: Address::zero(),
                amount: minimum,
            });
            root - minimum
        } else {
            let by0 = mul(amount0, total_supply)?
                .checked_div(reserve0)
                .unwrap_or_default();
            let by1 = mul(amount1, total_supply)?
                .checked_div(reserve1)
                .unwrap_or_default();
            by0.min(by1)
        };

        if liquidity.is_zero() {
            return Err(PairError::InsufficientLiquidityMinted);
        }

        self.sync_holder(to)?;
        self.state.shares.mint(to, liquidity)?;
        self.emit(PairEvent::Transfer {
            from: Address::zero(),
            to,
            amount: liquidity,
        });

        self.update(host, balance0, balance1);
        self.emit(PairEvent::Mint {
            to,
            amount0,
            amount1,
            liquidity,
        });
        info!(
            "Minted {} {} shares to {:?} for {} / {}",
            liquidity, self.meta.symbol, to, amount0, amount1
        );
        Ok(liquidity)
    }

    /// Burn the shares held by the pair and pay out the pro-rata assets
    pub fn burn<H: Host>(&mut self, host: &mut H, to: Address) -> Result<(U256, U256)> {
        self.guarded(host, "burn", |pair, host| pair.burn_inner(host, to))
    }

    fn burn_inner<H: Host>(&mut self, host: &mut H, to: Address) -> Result<(U256, U256)> {
        self.pull_fees()?;

        let pair_address = self.meta.address;
        let liquidity = self.state.shares.balance_of(pair_address);
        if liquidity.is_zero() {
            return Err(PairError::InsufficientLiquidityBurned);
        }

        let (balance0, balance1) = self.balances(host);
        let total_supply = self.state.shares.total_supply();
        let amount0 = mul_div(liquidity, balance0, total_supply)?;
        let amount1 = mul_div(liquidity, balance1, total_supply)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(PairError::InsufficientLiquidityBurned);
        }

        self.sync_holder(pair_address)?;
        self.state.shares.burn(pair_address, liquidity)?;
        self.emit(PairEvent::Transfer {
            from: pair_address,
            to: Address::zero(),
            amount: liquidity,
        });

        host.transfer(self.meta.token0, pair_address, to, amount0)?;
        host.transfer(self.meta.token1, pair_address, to, amount1)?;

        let (balance0, balance1) = self.balances(host);
        self.update(host, balance0, balance1);
        self.emit(PairEvent::Burn {
            to,
            amount0,
            amount1,
            liquidity,
        });
        info!(
            "Burned {} {} shares, paid {} / {} to {:?}",
            liquidity, self.meta.symbol, amount0, amount1, to
        );
        Ok((amount0, amount1))
    }

    /// Send the surplus of actual balance over recorded reserve to `to`
    pub fn skim<H: Host>(&mut self, host: &mut H, to: Address) -> Result<(U256, U256)> {
        self.guarded(host, "skim", |pair, host| {
            let (balance0, balance1) = pair.balances(host);
            let (surplus0, surplus1) = pair.state.reserves.surplus(balance0, balance1);

            let pair_address = pair.meta.address;
            if !surplus0.is_zero() {
                host.transfer(pair.meta.token0, pair_address, to, surplus0)?;
            }
            if !surplus1.is_zero() {
                host.transfer(pair.meta.token1, pair_address, to, surplus1)?;
            }
            Ok((surplus0, surplus1))
        })
    }

    /// Force recorded reserves to match actual balances
    pub fn sync<H: Host>(&mut self, host: &mut H) -> Result<()> {
        self.guarded(host, "sync", |pair, host| {
            let (balance0, balance1) = pair.balances(host);
            pair.update(host, balance0, balance1);
            Ok(())
        })
    }
}
