//! Shared fixture for pair integration tests
//!
//! One pair over two assets (18 decimals each unless asked otherwise) on an
//! in-memory host. Deposits and
//! swap inputs are minted straight onto the pair address, the same as a
//! holder pushing assets before calling in.

#![allow(dead_code)]

use ethers_core::types::{Address, U256};
use pair_config::PairConfig;
use pair_engine::{MemoryHost, Pair, PairParams, Result};
use tracing_subscriber::EnvFilter;

pub const START: u64 = 1_700_006_400; // start of an oracle period
pub const PERIOD: u64 = 7_200;
pub const WINDOW: u64 = 86_400;

pub fn token_a() -> Address {
    Address::repeat_byte(0x0a)
}

pub fn token_b() -> Address {
    Address::repeat_byte(0x0b)
}

pub fn pair_address() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn fees_address() -> Address {
    Address::repeat_byte(0xfe)
}

pub fn alice() -> Address {
    Address::repeat_byte(0x11)
}

pub fn bob() -> Address {
    Address::repeat_byte(0x22)
}

pub fn trader() -> Address {
    Address::repeat_byte(0x33)
}

pub fn e18(units: u64) -> U256 {
    U256::from(units) * U256::exp10(18)
}

pub fn e6(units: u64) -> U256 {
    U256::from(units) * U256::exp10(6)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Fixture {
    pub host: MemoryHost,
    pub pair: Pair,
}

impl Fixture {
    pub fn new(stable: bool) -> Self {
        Self::with_decimals(stable, 18, 18)
    }

    /// Pair whose asset 0 (`token_a`) and asset 1 (`token_b`) carry the
    /// given decimals
    pub fn with_decimals(stable: bool, decimals_a: u8, decimals_b: u8) -> Self {
        init_tracing();

        let mut host = MemoryHost::new(START);
        host.register_asset(token_a(), "AAA", decimals_a);
        host.register_asset(token_b(), "BBB", decimals_b);

        let params = PairParams {
            address: pair_address(),
            token_a: token_a(),
            token_b: token_b(),
            stable,
            fees_address: fees_address(),
        };
        let pair = Pair::new(&host, params, &PairConfig::default()).unwrap();
        Self { host, pair }
    }

    /// Pair with `amount0` / `amount1` deposited by alice
    pub fn seeded(stable: bool, amount0: U256, amount1: U256) -> Self {
        let mut fixture = Self::new(stable);
        fixture.deposit(alice(), amount0, amount1).unwrap();
        fixture
    }

    /// Push both assets onto the pair and mint shares to `provider`
    pub fn deposit(&mut self, provider: Address, amount0: U256, amount1: U256) -> Result<U256> {
        self.push(token_a(), amount0);
        self.push(token_b(), amount1);
        self.pair.mint(&mut self.host, provider)
    }

    /// Put `amount` of `asset` on the pair address without syncing
    pub fn push(&mut self, asset: Address, amount: U256) {
        self.host.mint(asset, pair_address(), amount).unwrap();
    }

    /// Exact-input swap at the current quote; returns the output
    pub fn swap_in(&mut self, asset_in: Address, amount_in: U256) -> Result<U256> {
        let amount_out = self.pair.get_amount_out(amount_in, asset_in)?;
        self.push(asset_in, amount_in);

        let (out0, out1) = if asset_in == token_a() {
            (U256::zero(), amount_out)
        } else {
            (amount_out, U256::zero())
        };
        self.pair
            .swap(&mut self.host, trader(), out0, out1, trader(), None)?;
        Ok(amount_out)
    }

    /// Move `holder`'s shares onto the pair and burn them
    pub fn withdraw(&mut self, holder: Address, shares: U256) -> Result<(U256, U256)> {
        self.pair
            .transfer(&mut self.host, holder, pair_address(), shares)?;
        self.pair.burn(&mut self.host, holder)
    }

    pub fn balance(&self, asset: Address, holder: Address) -> U256 {
        use pair_engine::Host;
        self.host.balance_of(asset, holder)
    }

    pub fn advance(&mut self, seconds: u64) {
        self.host.advance_time(seconds);
    }
}
