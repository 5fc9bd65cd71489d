//! Host ledger abstraction
//!
//! The pair never owns asset balances. It reads and moves them through a
//! [`Host`], which also supplies the clock and asset metadata. Hosts must be
//! able to checkpoint and restore every balance so a failed call leaves no
//! trace.

use crate::error::{PairError, Result};
use ethers_core::types::{Address, U256};
use std::collections::HashMap;

pub trait Host {
    /// Opaque snapshot of every balance
    type Checkpoint;

    fn block_timestamp(&self) -> u64;

    fn decimals(&self, asset: Address) -> Result<u8>;

    fn symbol(&self, asset: Address) -> Result<String>;

    fn balance_of(&self, asset: Address, holder: Address) -> U256;

    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> Result<()>;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

#[derive(Debug, Clone)]
struct AssetInfo {
    symbol: String,
    decimals: u8,
    balances: HashMap<Address, U256>,
}

/// Snapshot taken by [`MemoryHost::checkpoint`]
#[derive(Debug, Clone)]
pub struct MemoryCheckpoint {
    assets: HashMap<Address, AssetInfo>,
}

/// In-process host: hash-map balances and a settable clock
#[derive(Debug, Clone)]
pub struct MemoryHost {
    timestamp: u64,
    assets: HashMap<Address, AssetInfo>,
}

impl MemoryHost {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            assets: HashMap::new(),
        }
    }

    pub fn register_asset(&mut self, asset: Address, symbol: &str, decimals: u8) {
        self.assets.insert(
            asset,
            AssetInfo {
                symbol: symbol.to_string(),
                decimals,
                balances: HashMap::new(),
            },
        );
    }

    /// Create `amount` of `asset` out of thin air for `to`
    pub fn mint(&mut self, asset: Address, to: Address, amount: U256) -> Result<()> {
        let info = self.asset_mut(asset)?;
        let balance = info.balances.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or(PairError::Overflow)?;
        Ok(())
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    fn asset(&self, asset: Address) -> Result<&AssetInfo> {
        self.assets.get(&asset).ok_or(PairError::UnknownAsset(asset))
    }

    fn asset_mut(&mut self, asset: Address) -> Result<&mut AssetInfo> {
        self.assets
            .get_mut(&asset)
            .ok_or(PairError::UnknownAsset(asset))
    }
}

impl Host for MemoryHost {
    type Checkpoint = MemoryCheckpoint;

    fn block_timestamp(&self) -> u64 {
        self.timestamp
    }

    fn decimals(&self, asset: Address) -> Result<u8> {
        Ok(self.asset(asset)?.decimals)
    }

    fn symbol(&self, asset: Address) -> Result<String> {
        Ok(self.asset(asset)?.symbol.clone())
    }

    fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.assets
            .get(&asset)
            .and_then(|info| info.balances.get(&holder))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        let info = self.asset_mut(asset)?;
        let balance = info.balances.get(&from).copied().unwrap_or_default();
        let remaining = balance
            .checked_sub(amount)
            .ok_or(PairError::InsufficientBalance {
                holder: from,
                balance,
                amount,
            })?;
        info.balances.insert(from, remaining);

        let credited = info.balances.entry(to).or_default();
        *credited = credited.checked_add(amount).ok_or(PairError::Overflow)?;
        Ok(())
    }

    fn checkpoint(&self) -> MemoryCheckpoint {
        MemoryCheckpoint {
            assets: self.assets.clone(),
        }
    }

    fn rollback(&mut self, checkpoint: MemoryCheckpoint) {
        self.assets = checkpoint.assets;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_transfer_and_metadata() {
        let mut host = MemoryHost::new(10);
        host.register_asset(addr(1), "USDC", 6);
        host.mint(addr(1), addr(7), U256::from(100)).unwrap();

        host.transfer(addr(1), addr(7), addr(8), U256::from(30)).unwrap();
        assert_eq!(host.balance_of(addr(1), addr(7)), U256::from(70));
        assert_eq!(host.balance_of(addr(1), addr(8)), U256::from(30));
        assert_eq!(host.decimals(addr(1)).unwrap(), 6);
        assert_eq!(host.symbol(addr(1)).unwrap(), "USDC");

        assert!(matches!(
            host.transfer(addr(1), addr(8), addr(7), U256::from(31)),
            Err(PairError::InsufficientBalance { .. })
        ));
        assert_eq!(host.decimals(addr(2)), Err(PairError::UnknownAsset(addr(2))));
        assert!(host.balance_of(addr(2), addr(7)).is_zero());
    }

    #[test]
    fn test_rollback_restores_balances() {
        let mut host = MemoryHost::new(0);
        host.register_asset(addr(1), "A", 18);
        host.mint(addr(1), addr(7), U256::from(5)).unwrap();

        let checkpoint = host.checkpoint();
        host.transfer(addr(1), addr(7), addr(8), U256::from(5)).unwrap();
        host.rollback(checkpoint);

        assert_eq!(host.balance_of(addr(1), addr(7)), U256::from(5));
        assert!(host.balance_of(addr(1), addr(8)).is_zero());
    }

    #[test]
    fn test_clock() {
        let mut host = MemoryHost::new(100);
        host.advance_time(25);
        assert_eq!(host.block_timestamp(), 125);
        host.set_timestamp(7);
        assert_eq!(host.block_timestamp(), 7);
    }
}
