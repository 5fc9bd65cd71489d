//! Fee distribution ledger
//!
//! Lazy pull-based reward indices. Two global indices grow by
//! `fees * 1e18 / total_supply` whenever fees are pulled from the collector;
//! each holder remembers the index it last saw and banks
//! `balance * (index - supply_index) / 1e18` into `claimable` the next time
//! its balance is about to change. No holder has to act to stay current.

use crate::error::Result;
use crate::math::{add, mul_div, precision, sub};
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-holder reward state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRewards {
    pub supply_index0: U256,
    pub supply_index1: U256,
    pub claimable0: U256,
    pub claimable1: U256,
}

#[derive(Debug, Clone, Default)]
pub struct FeeDistribution {
    index0: U256,
    index1: U256,
    /// Fees pulled while nothing could receive them, plus rounding dust
    held0: U256,
    held1: U256,
    accounts: HashMap<Address, AccountRewards>,
}

impl FeeDistribution {
    pub fn indices(&self) -> (U256, U256) {
        (self.index0, self.index1)
    }

    pub fn held(&self) -> (U256, U256) {
        (self.held0, self.held1)
    }

    pub fn account(&self, account: Address) -> AccountRewards {
        self.accounts.get(&account).copied().unwrap_or_default()
    }

    /// Fold freshly pulled fees into the indices
    ///
    /// With zero supply everything is held for a later pull. Otherwise held
    /// fees join the new ones, and whatever the integer index cannot express
    /// stays held. Returns the amounts actually folded in.
    pub(crate) fn distribute(
        &mut self,
        amount0: U256,
        amount1: U256,
        total_supply: U256,
    ) -> Result<(U256, U256)> {
        let (index0, held0, distributed0) =
            fold(self.index0, self.held0, amount0, total_supply)?;
        let (index1, held1, distributed1) =
            fold(self.index1, self.held1, amount1, total_supply)?;

        self.index0 = index0;
        self.held0 = held0;
        self.index1 = index1;
        self.held1 = held1;
        Ok((distributed0, distributed1))
    }

    /// Bank what `balance` earned since the account last synced
    ///
    /// Must run before the account's balance changes.
    pub(crate) fn sync_account(&mut self, account: Address, balance: U256) -> Result<()> {
        let (index0, index1) = (self.index0, self.index1);
        let state = self.accounts.entry(account).or_default();

        if !balance.is_zero() {
            let delta0 = sub(index0, state.supply_index0)?;
            let delta1 = sub(index1, state.supply_index1)?;
            state.claimable0 = add(state.claimable0, mul_div(balance, delta0, precision())?)?;
            state.claimable1 = add(state.claimable1, mul_div(balance, delta1, precision())?)?;
        }

        state.supply_index0 = index0;
        state.supply_index1 = index1;
        Ok(())
    }

    /// Zero and return the account's claimable amounts
    pub(crate) fn take_claimable(&mut self, account: Address) -> (U256, U256) {
        match self.accounts.get_mut(&account) {
            Some(state) => (
                std::mem::take(&mut state.claimable0),
                std::mem::take(&mut state.claimable1),
            ),
            None => (U256::zero(), U256::zero()),
        }
    }
}

/// Returns `(index, held, distributed)` after adding `amount`
fn fold(index: U256, held: U256, amount: U256, total_supply: U256) -> Result<(U256, U256, U256)> {
    let pending = add(held, amount)?;
    if total_supply.is_zero() || pending.is_zero() {
        return Ok((index, pending, U256::zero()));
    }

    let ratio = mul_div(pending, precision(), total_supply)?;
    let distributed = mul_div(ratio, total_supply, precision())?;
    Ok((add(index, ratio)?, sub(pending, distributed)?, distributed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn e18(units: u64) -> U256 {
        U256::from(units) * U256::exp10(18)
    }

    #[test]
    fn test_index_growth() {
        let mut ledger = FeeDistribution::default();
        let distributed = ledger
            .distribute(U256::from(500), U256::from(1_000), U256::from(1_000))
            .unwrap();

        assert_eq!(distributed, (U256::from(500), U256::from(1_000)));
        assert_eq!(ledger.indices(), (e18(1) / 2, e18(1)));
        assert_eq!(ledger.held(), (U256::zero(), U256::zero()));
    }

    #[test]
    fn test_zero_supply_holds_fees() {
        let mut ledger = FeeDistribution::default();
        ledger
            .distribute(U256::from(70), U256::zero(), U256::zero())
            .unwrap();
        assert_eq!(ledger.indices(), (U256::zero(), U256::zero()));
        assert_eq!(ledger.held(), (U256::from(70), U256::zero()));

        // Released by the first pull that sees supply
        ledger
            .distribute(U256::from(30), U256::zero(), U256::from(100))
            .unwrap();
        assert_eq!(ledger.indices().0, e18(1));
        assert_eq!(ledger.held(), (U256::zero(), U256::zero()));
    }

    #[test]
    fn test_rounding_dust_is_held() {
        let mut ledger = FeeDistribution::default();
        let supply = U256::exp10(19) * 3; // 3e19 shares
        let (distributed, _) = ledger.distribute(U256::from(10), U256::zero(), supply).unwrap();

        let (held, _) = ledger.held();
        assert_eq!(distributed + held, U256::from(10));
    }

    #[test]
    fn test_sync_account_accrues_before_balance_change() {
        let mut ledger = FeeDistribution::default();
        ledger.sync_account(addr(1), U256::zero()).unwrap();

        ledger
            .distribute(U256::from(200), U256::from(100), U256::from(400))
            .unwrap();
        ledger.sync_account(addr(1), U256::from(100)).unwrap();

        let state = ledger.account(addr(1));
        assert_eq!(state.claimable0, U256::from(50));
        assert_eq!(state.claimable1, U256::from(25));
        assert_eq!(state.supply_index0, ledger.indices().0);

        // Syncing again without index growth adds nothing
        ledger.sync_account(addr(1), U256::from(100)).unwrap();
        assert_eq!(ledger.account(addr(1)).claimable0, U256::from(50));

        assert_eq!(
            ledger.take_claimable(addr(1)),
            (U256::from(50), U256::from(25))
        );
        assert_eq!(ledger.account(addr(1)).claimable0, U256::zero());
        assert_eq!(ledger.take_claimable(addr(9)), (U256::zero(), U256::zero()));
    }

    #[test]
    fn test_new_account_starts_at_current_index() {
        let mut ledger = FeeDistribution::default();
        ledger
            .distribute(U256::from(1_000), U256::zero(), U256::from(10))
            .unwrap();

        // An account first seen now must not collect history
        ledger.sync_account(addr(2), U256::zero()).unwrap();
        ledger.sync_account(addr(2), U256::from(10)).unwrap();
        assert!(ledger.account(addr(2)).claimable0.is_zero());
    }
}
