//! Fee collector slot
//!
//! Trading fees leave the pool address at swap time and land on the
//! collector's own address. The collector only counts what it owes the pool;
//! the index growth happens when the pool pulls via [`FeeCollector::claim`].

use crate::error::Result;
use crate::math::add;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCollector {
    address: Address,
    outstanding0: U256,
    outstanding1: U256,
}

impl FeeCollector {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            outstanding0: U256::zero(),
            outstanding1: U256::zero(),
        }
    }

    /// Host address holding collected fees and paying claims
    pub fn address(&self) -> Address {
        self.address
    }

    /// Fees routed in but not yet pulled by the pool
    pub fn outstanding(&self) -> (U256, U256) {
        (self.outstanding0, self.outstanding1)
    }

    /// Record `amount` of asset 0 (or 1) already transferred to the collector
    pub(crate) fn route(&mut self, is_token0: bool, amount: U256) -> Result<()> {
        if is_token0 {
            self.outstanding0 = add(self.outstanding0, amount)?;
        } else {
            self.outstanding1 = add(self.outstanding1, amount)?;
        }
        Ok(())
    }

    /// Return everything outstanding and zero it
    pub(crate) fn claim(&mut self) -> (U256, U256) {
        (
            std::mem::take(&mut self.outstanding0),
            std::mem::take(&mut self.outstanding1),
        )
    }
}
