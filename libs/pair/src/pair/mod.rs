//! The pair: pooled reserves of two assets behind one re-entrancy guard
//!
//! Entry points are split by concern:
//! - [`liquidity`]: `mint`, `burn`, `skim`, `sync`
//! - [`swap`]: optimistic transfer, flash callback and the K gate
//! - [`share_token`]: pool-share transfers, approvals, permit, fee claims
//!
//! Every guarded entry point runs through [`Pair::guarded`], which snapshots
//! the pair's mutable state and the host's balances and restores both if the
//! call fails. A failed call therefore leaves no trace, events included.

mod liquidity;
mod share_token;
mod swap;

pub use swap::{SwapCallback, SwapCallee, SwapStage};

use crate::collector::FeeCollector;
use crate::curve::{amount_after_fee, Curve};
use crate::error::{PairError, Result};
use crate::events::PairEvent;
use crate::guard::ReentrancyGuard;
use crate::host::Host;
use crate::oracle::{Observation, Oracle};
use crate::permit::domain_separator;
use crate::reserves::ReserveLedger;
use crate::rewards::{AccountRewards, FeeDistribution};
use crate::shares::ShareLedger;
use ethers_core::types::{Address, H256, U256};
use pair_config::protocol::share_token::{
    DECIMALS, STABLE_NAME_PREFIX, STABLE_SYMBOL_PREFIX, VOLATILE_NAME_PREFIX,
    VOLATILE_SYMBOL_PREFIX,
};
use pair_config::protocol::MAX_ASSET_DECIMALS;
use pair_config::PairConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Creation request, as issued by a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairParams {
    /// Host address of the pair itself
    pub address: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub stable: bool,
    /// Host address of the pair's fee collector
    pub fees_address: Address,
}

/// Immutable identity of a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairMetadata {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub stable: bool,
    pub fee_bps: u64,
    /// `10^decimals` of each asset
    pub scale0: U256,
    pub scale1: U256,
    pub curve: Curve,
    pub name: String,
    pub symbol: String,
    pub chain_id: u64,
    pub domain_separator: H256,
}

/// Everything a failed call must roll back
#[derive(Debug, Clone)]
struct PairState {
    reserves: ReserveLedger,
    oracle: Oracle,
    shares: ShareLedger,
    rewards: FeeDistribution,
    collector: FeeCollector,
    events: Vec<PairEvent>,
}

#[derive(Debug, Clone)]
pub struct Pair {
    meta: PairMetadata,
    state: PairState,
    guard: ReentrancyGuard,
    stage: SwapStage,
}

impl Pair {
    /// Create a pair, fixing fee tier and decimal scalars from the host
    pub fn new<H: Host>(host: &H, params: PairParams, config: &PairConfig) -> Result<Self> {
        if params.token_a == params.token_b {
            return Err(PairError::IdenticalAddresses);
        }
        let (token0, token1) = if params.token_a < params.token_b {
            (params.token_a, params.token_b)
        } else {
            (params.token_b, params.token_a)
        };
        if token0.is_zero() {
            return Err(PairError::ZeroAddress);
        }

        config
            .validate()
            .map_err(|err| PairError::InvalidConfig(err.to_string()))?;
        let fee_bps = config.fee_bps(params.stable);

        let scale0 = decimal_scale(host.decimals(token0)?)?;
        let scale1 = decimal_scale(host.decimals(token1)?)?;
        let curve = if params.stable {
            Curve::Stable { scale0, scale1 }
        } else {
            Curve::Volatile
        };

        let pair_symbols = format!("{}/{}", host.symbol(token0)?, host.symbol(token1)?);
        let (name, symbol) = if params.stable {
            (
                format!("{} - {}", STABLE_NAME_PREFIX, pair_symbols),
                format!("{}-{}", STABLE_SYMBOL_PREFIX, pair_symbols),
            )
        } else {
            (
                format!("{} - {}", VOLATILE_NAME_PREFIX, pair_symbols),
                format!("{}-{}", VOLATILE_SYMBOL_PREFIX, pair_symbols),
            )
        };

        let oracle = Oracle::new(config.oracle.window_size, config.oracle.granularity)?;
        let chain_id = config.permit.chain_id;
        let domain_separator = domain_separator(&name, chain_id, params.address);
        let now = host.block_timestamp();

        info!(
            "Created {} pair {:?} ({:?}/{:?}), fee {} bps",
            symbol, params.address, token0, token1, fee_bps
        );

        Ok(Self {
            meta: PairMetadata {
                address: params.address,
                token0,
                token1,
                stable: params.stable,
                fee_bps,
                scale0,
                scale1,
                curve,
                name,
                symbol,
                chain_id,
                domain_separator,
            },
            state: PairState {
                reserves: ReserveLedger::new(now),
                oracle,
                shares: ShareLedger::default(),
                rewards: FeeDistribution::default(),
                collector: FeeCollector::new(params.fees_address),
                events: Vec::new(),
            },
            guard: ReentrancyGuard::default(),
            stage: SwapStage::Idle,
        })
    }

    // ---- read surface -------------------------------------------------

    pub fn metadata(&self) -> &PairMetadata {
        &self.meta
    }

    pub fn address(&self) -> Address {
        self.meta.address
    }

    pub fn tokens(&self) -> (Address, Address) {
        (self.meta.token0, self.meta.token1)
    }

    pub fn stable(&self) -> bool {
        self.meta.stable
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn symbol(&self) -> &str {
        &self.meta.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Recorded reserves and the time they were recorded
    pub fn get_reserves(&self) -> (U256, U256, u64) {
        self.state.reserves.reserves()
    }

    /// Stored cumulative integrals as of the last sync
    pub fn cumulative_reserves_last(&self) -> (U256, U256) {
        (
            self.state.reserves.reserve0_cumulative_last,
            self.state.reserves.reserve1_cumulative_last,
        )
    }

    /// Cumulative integrals as they would read now, without writing state
    pub fn current_cumulative_reserves<H: Host>(&self, host: &H) -> (U256, U256, u64) {
        let now = host.block_timestamp();
        let (c0, c1) = self.state.reserves.cumulatives_at(now);
        (c0, c1, now)
    }

    pub fn observation(&self, index: usize) -> Option<Observation> {
        self.state.oracle.observation(index).copied()
    }

    pub fn observation_length(&self) -> usize {
        self.state.oracle.ring_len()
    }

    pub fn last_observation(&self) -> Option<Observation> {
        self.state.oracle.last().copied()
    }

    pub fn period_size(&self) -> u64 {
        self.state.oracle.period_size()
    }

    pub fn fees_address(&self) -> Address {
        self.state.collector.address()
    }

    /// Fees routed to the collector and not yet pulled into the indices
    pub fn outstanding_fees(&self) -> (U256, U256) {
        self.state.collector.outstanding()
    }

    pub fn account_fee_rewards(&self, account: Address) -> AccountRewards {
        self.state.rewards.account(account)
    }

    pub fn fee_indices(&self) -> (U256, U256) {
        self.state.rewards.indices()
    }

    /// Pulled fees not yet folded into the indices
    pub fn held_fees(&self) -> (U256, U256) {
        self.state.rewards.held()
    }

    pub fn total_supply(&self) -> U256 {
        self.state.shares.total_supply()
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.state.shares.balance_of(holder)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state.shares.allowance(owner, spender)
    }

    pub fn nonces(&self, owner: Address) -> U256 {
        self.state.shares.nonce(owner)
    }

    pub fn domain_separator(&self) -> H256 {
        self.meta.domain_separator
    }

    pub fn is_locked(&self) -> bool {
        self.guard.is_locked()
    }

    pub fn swap_stage(&self) -> SwapStage {
        self.stage
    }

    pub fn events(&self) -> &[PairEvent] {
        &self.state.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<PairEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Output bought by `amount_in` of `token_in` at the recorded reserves
    pub fn get_amount_out(&self, amount_in: U256, token_in: Address) -> Result<U256> {
        let (reserve0, reserve1, _) = self.get_reserves();
        self.quote(amount_in, token_in, reserve0, reserve1)
    }

    /// Manipulation-resistant quote against time-averaged reserves
    ///
    /// Averages run from the oldest observation still inside the window up
    /// to now. Fails with [`PairError::MissingObservation`] when no such
    /// observation exists.
    pub fn get_token_price<H: Host>(
        &self,
        host: &H,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        self.check_token(token_in)?;
        let now = host.block_timestamp();
        let anchor = self.state.oracle.first_in_window(now)?;
        let (c0, c1) = self.state.reserves.cumulatives_at(now);

        let elapsed = U256::from(now - anchor.timestamp);
        let average0 = c0.overflowing_sub(anchor.reserve0_cumulative).0 / elapsed;
        let average1 = c1.overflowing_sub(anchor.reserve1_cumulative).0 / elapsed;

        self.quote(amount_in, token_in, average0, average1)
    }

    fn quote(
        &self,
        amount_in: U256,
        token_in: Address,
        reserve0: U256,
        reserve1: U256,
    ) -> Result<U256> {
        self.check_token(token_in)?;
        let amount_in = amount_after_fee(amount_in, self.meta.fee_bps)?;
        self.meta
            .curve
            .amount_out(amount_in, token_in == self.meta.token0, reserve0, reserve1)
    }

    fn check_token(&self, token: Address) -> Result<()> {
        if token != self.meta.token0 && token != self.meta.token1 {
            return Err(PairError::InvalidToken(token));
        }
        Ok(())
    }

    // ---- internals shared by the entry points -------------------------

    /// Run `operation` under the guard with all-or-nothing semantics
    fn guarded<H, T, F>(&mut self, host: &mut H, operation: &'static str, f: F) -> Result<T>
    where
        H: Host,
        F: FnOnce(&mut Self, &mut H) -> Result<T>,
    {
        if let Err(err) = self.guard.enter() {
            warn!(
                "Rejected re-entrant {} on pair {:?}",
                operation, self.meta.address
            );
            return Err(err);
        }

        let snapshot = self.state.clone();
        let checkpoint = host.checkpoint();

        let result = f(self, host);
        if let Err(err) = &result {
            self.state = snapshot;
            host.rollback(checkpoint);
            warn!(
                "{} on pair {:?} failed, state rolled back: {}",
                operation, self.meta.address, err
            );
        }

        self.stage = SwapStage::Idle;
        self.guard.exit();
        result
    }

    fn balances<H: Host>(&self, host: &H) -> (U256, U256) {
        (
            host.balance_of(self.meta.token0, self.meta.address),
            host.balance_of(self.meta.token1, self.meta.address),
        )
    }

    /// Advance the integrals, record the oracle, then store new reserves
    fn update<H: Host>(&mut self, host: &H, balance0: U256, balance1: U256) {
        let now = host.block_timestamp();
        if self.state.reserves.accumulate(now) {
            let (c0, c1) = self.cumulative_reserves_last();
            if self.state.oracle.record(now, c0, c1) {
                debug!(
                    "Pair {:?} recorded observation in slot {} at {}",
                    self.meta.address,
                    self.state.oracle.index_of(now),
                    now
                );
            }
        }

        self.state.reserves.overwrite(balance0, balance1, now);
        self.emit(PairEvent::Sync {
            reserve0: balance0,
            reserve1: balance1,
        });
        debug!(
            "Pair {:?} synced reserves {} / {}",
            self.meta.address, balance0, balance1
        );
    }

    /// Pull outstanding fees from the collector into the reward indices
    fn pull_fees(&mut self) -> Result<()> {
        let (amount0, amount1) = self.state.collector.claim();
        let supply = self.state.shares.total_supply();
        let (distributed0, distributed1) =
            self.state.rewards.distribute(amount0, amount1, supply)?;

        if !amount0.is_zero() || !amount1.is_zero() {
            debug!(
                "Pair {:?} pulled fees {} / {}, distributed {} / {}",
                self.meta.address, amount0, amount1, distributed0, distributed1
            );
        }
        Ok(())
    }

    /// Bring `account`'s reward state up to date before its balance moves
    fn sync_holder(&mut self, account: Address) -> Result<()> {
        let balance = self.state.shares.balance_of(account);
        self.state.rewards.sync_account(account, balance)
    }

    fn emit(&mut self, event: PairEvent) {
        self.state.events.push(event);
    }
}

fn decimal_scale(decimals: u8) -> Result<U256> {
    if decimals > MAX_ASSET_DECIMALS {
        return Err(PairError::InvalidConfig(format!(
            "asset decimals {} exceed {}",
            decimals, MAX_ASSET_DECIMALS
        )));
    }
    Ok(U256::exp10(usize::from(decimals)))
}
