//! TWAP oracle ring
//!
//! Fixed-length ring of reserve-cumulative snapshots, one slot per period.
//! Slot index is `(timestamp / period_size) % len`. A slot is written only the
//! first time its period is touched, so each period keeps exactly one anchor
//! point for time-weighted averages.

use crate::error::{PairError, Result};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: u64,
    pub reserve0_cumulative: U256,
    pub reserve1_cumulative: U256,
}

impl Observation {
    /// Never-written slot
    pub fn is_empty(&self) -> bool {
        self.timestamp == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oracle {
    period_size: u64,
    slots: Vec<Observation>,
    last_index: Option<usize>,
}

impl Oracle {
    /// Ring of `granularity` slots covering `window_size` seconds
    pub fn new(window_size: u64, granularity: u64) -> Result<Self> {
        if granularity <= 1 || window_size % granularity != 0 || window_size < granularity {
            return Err(PairError::InvalidConfig(format!(
                "oracle window {}s cannot be split into {} periods",
                window_size, granularity
            )));
        }
        let len = usize::try_from(granularity)
            .map_err(|_| PairError::InvalidConfig("oracle granularity too large".to_string()))?;

        Ok(Self {
            period_size: window_size / granularity,
            slots: vec![Observation::default(); len],
            last_index: None,
        })
    }

    pub fn period_size(&self) -> u64 {
        self.period_size
    }

    /// Number of slots in the ring
    pub fn ring_len(&self) -> usize {
        self.slots.len()
    }

    pub fn window_size(&self) -> u64 {
        self.period_size * self.slots.len() as u64
    }

    pub fn index_of(&self, timestamp: u64) -> usize {
        ((timestamp / self.period_size) % self.slots.len() as u64) as usize
    }

    pub fn observation(&self, index: usize) -> Option<&Observation> {
        self.slots.get(index)
    }

    /// Most recently written observation
    pub fn last(&self) -> Option<&Observation> {
        self.last_index.and_then(|index| self.slots.get(index))
    }

    /// Record an observation unless this period already has one
    ///
    /// Returns whether the slot was written.
    pub(crate) fn record(
        &mut self,
        timestamp: u64,
        reserve0_cumulative: U256,
        reserve1_cumulative: U256,
    ) -> bool {
        let index = self.index_of(timestamp);
        let period = timestamp / self.period_size;
        let slot = &mut self.slots[index];

        if !slot.is_empty() && slot.timestamp / self.period_size == period {
            return false;
        }

        *slot = Observation {
            timestamp,
            reserve0_cumulative,
            reserve1_cumulative,
        };
        self.last_index = Some(index);
        true
    }

    /// Oldest observation still inside the window ending at `now`
    ///
    /// The current slot may still hold an observation from the previous cycle,
    /// so every slot is considered, not just those after it. Observations taken
    /// at `now` itself are skipped since no time has elapsed against them.
    pub fn first_in_window(&self, now: u64) -> Result<&Observation> {
        let window = self.window_size();

        self.slots
            .iter()
            .filter(|observation| {
                !observation.is_empty()
                    && observation.timestamp < now
                    && now - observation.timestamp <= window
            })
            .min_by_key(|observation| observation.timestamp)
            .ok_or(PairError::MissingObservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: u64 = 100;
    const BASE: u64 = 1_000_000; // slot 0 of a fresh cycle

    fn oracle() -> Oracle {
        Oracle::new(PERIOD * 4, 4).unwrap()
    }

    #[test]
    fn test_geometry() {
        let oracle = oracle();
        assert_eq!(oracle.period_size(), PERIOD);
        assert_eq!(oracle.ring_len(), 4);
        assert_eq!(oracle.window_size(), 400);
        assert_eq!(oracle.index_of(BASE), 0);
        assert_eq!(oracle.index_of(BASE + 250), 2);
        assert_eq!(oracle.index_of(BASE + 400), 0);

        assert!(Oracle::new(1_000, 7).is_err());
        assert!(Oracle::new(1_000, 1).is_err());
    }

    #[test]
    fn test_one_write_per_period() {
        let mut oracle = oracle();

        assert!(oracle.record(BASE + 10, U256::from(1), U256::from(1)));
        assert!(!oracle.record(BASE + 60, U256::from(2), U256::from(2)));

        let stored = oracle.observation(0).unwrap();
        assert_eq!(stored.timestamp, BASE + 10);
        assert_eq!(stored.reserve0_cumulative, U256::from(1));

        // Next period, next slot
        assert!(oracle.record(BASE + 110, U256::from(3), U256::from(3)));
        assert_eq!(oracle.last().unwrap().timestamp, BASE + 110);

        // Same slot one full cycle later is a new period
        assert!(oracle.record(BASE + 410, U256::from(4), U256::from(4)));
        assert_eq!(oracle.observation(0).unwrap().timestamp, BASE + 410);
    }

    #[test]
    fn test_first_in_window_picks_oldest() {
        let mut oracle = oracle();
        oracle.record(BASE + 10, U256::from(1), U256::zero());
        oracle.record(BASE + 110, U256::from(2), U256::zero());
        oracle.record(BASE + 210, U256::from(3), U256::zero());

        let first = oracle.first_in_window(BASE + 350).unwrap();
        assert_eq!(first.timestamp, BASE + 10);
    }

    #[test]
    fn test_previous_cycle_in_current_slot_is_oldest() {
        let mut oracle = oracle();
        // Late in slot 0, then early in slot 1
        oracle.record(BASE + 90, U256::from(1), U256::zero());
        oracle.record(BASE + 110, U256::from(2), U256::zero());

        // Back in slot 0 one cycle later, the slot 0 observation is 360s old
        let now = BASE + 450;
        assert_eq!(oracle.index_of(now), 0);
        let first = oracle.first_in_window(now).unwrap();
        assert_eq!(first.timestamp, BASE + 90);
    }

    #[test]
    fn test_missing_observation() {
        let mut oracle = oracle();
        assert_eq!(
            oracle.first_in_window(BASE).unwrap_err(),
            PairError::MissingObservation
        );

        // Observation at `now` carries no elapsed time
        oracle.record(BASE + 10, U256::one(), U256::one());
        assert!(oracle.first_in_window(BASE + 10).is_err());
        assert!(oracle.first_in_window(BASE + 11).is_ok());

        // Everything older than the window is stale
        assert_eq!(
            oracle.first_in_window(BASE + 10 + 401).unwrap_err(),
            PairError::MissingObservation
        );
    }
}
