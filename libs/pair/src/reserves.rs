//! Reserve ledger
//!
//! Recorded (as opposed to actual) balances of the two pooled assets, the
//! time of the last synchronization and the running time-integrals of both
//! reserves. Integrals wrap at 2^256; consumers only ever take differences.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveLedger {
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_timestamp_last: u64,
    pub reserve0_cumulative_last: U256,
    pub reserve1_cumulative_last: U256,
}

impl ReserveLedger {
    /// Empty ledger anchored at `now`
    pub fn new(now: u64) -> Self {
        Self {
            block_timestamp_last: now,
            ..Self::default()
        }
    }

    pub fn reserves(&self) -> (U256, U256, u64) {
        (self.reserve0, self.reserve1, self.block_timestamp_last)
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.block_timestamp_last)
    }

    /// Cumulative integrals as they would read at `now`, without writing
    pub fn cumulatives_at(&self, now: u64) -> (U256, U256) {
        let elapsed = U256::from(self.elapsed(now));
        (
            wrapping_accumulate(self.reserve0_cumulative_last, self.reserve0, elapsed),
            wrapping_accumulate(self.reserve1_cumulative_last, self.reserve1, elapsed),
        )
    }

    /// Fold the interval since the last sync into the integrals
    ///
    /// Uses the reserves that were in force during the interval. Returns
    /// whether any time elapsed.
    pub(crate) fn accumulate(&mut self, now: u64) -> bool {
        if self.elapsed(now) == 0 {
            return false;
        }
        let (c0, c1) = self.cumulatives_at(now);
        self.reserve0_cumulative_last = c0;
        self.reserve1_cumulative_last = c1;
        true
    }

    pub(crate) fn overwrite(&mut self, balance0: U256, balance1: U256, now: u64) {
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.block_timestamp_last = now;
    }

    /// Actual balance held above the recorded reserve, per asset
    pub fn surplus(&self, balance0: U256, balance1: U256) -> (U256, U256) {
        (
            balance0.saturating_sub(self.reserve0),
            balance1.saturating_sub(self.reserve1),
        )
    }
}

fn wrapping_accumulate(cumulative: U256, reserve: U256, elapsed: U256) -> U256 {
    cumulative.overflowing_add(reserve.overflowing_mul(elapsed).0).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_uses_reserves_in_force() {
        let mut ledger = ReserveLedger::new(100);
        ledger.overwrite(U256::from(10), U256::from(20), 100);

        assert!(ledger.accumulate(130));
        assert_eq!(ledger.reserve0_cumulative_last, U256::from(300));
        assert_eq!(ledger.reserve1_cumulative_last, U256::from(600));

        // New balances only count from their own sync onwards
        ledger.overwrite(U256::from(1_000), U256::from(1), 130);
        assert!(ledger.accumulate(140));
        assert_eq!(ledger.reserve0_cumulative_last, U256::from(300 + 10_000));
        assert_eq!(ledger.reserve1_cumulative_last, U256::from(600 + 10));
    }

    #[test]
    fn test_zero_elapsed_is_noop() {
        let mut ledger = ReserveLedger::new(50);
        ledger.overwrite(U256::from(7), U256::from(9), 50);

        assert!(!ledger.accumulate(50));
        assert!(ledger.reserve0_cumulative_last.is_zero());
        assert_eq!(ledger.cumulatives_at(50), (U256::zero(), U256::zero()));
    }

    #[test]
    fn test_cumulatives_wrap() {
        let mut ledger = ReserveLedger::new(0);
        ledger.reserve0_cumulative_last = U256::MAX;
        ledger.overwrite(U256::from(2), U256::zero(), 0);

        let (c0, c1) = ledger.cumulatives_at(1);
        assert_eq!(c0, U256::one());
        assert!(c1.is_zero());
    }

    #[test]
    fn test_surplus() {
        let mut ledger = ReserveLedger::new(0);
        ledger.overwrite(U256::from(100), U256::from(100), 0);

        assert_eq!(
            ledger.surplus(U256::from(150), U256::from(90)),
            (U256::from(50), U256::zero())
        );
    }
}
