//! Pool-share ledger
//!
//! Raw balance bookkeeping for the 18-decimal claim token. Reward
//! synchronization is the caller's job: the pair syncs fee state for every
//! account before calling anything here that moves a balance.

use crate::error::{PairError, Result};
use crate::math::{add, sub};
use ethers_core::types::{Address, U256};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, U256>,
}

impl ShareLedger {
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn nonce(&self, owner: Address) -> U256 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    pub(crate) fn mint(&mut self, to: Address, amount: U256) -> Result<()> {
        self.total_supply = add(self.total_supply, amount)?;
        let balance = add(self.balance_of(to), amount)?;
        self.balances.insert(to, balance);
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: Address, amount: U256) -> Result<()> {
        let balance = self.debit(from, amount)?;
        self.balances.insert(from, balance);
        self.total_supply = sub(self.total_supply, amount)?;
        Ok(())
    }

    pub(crate) fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let remaining = self.debit(from, amount)?;
        self.balances.insert(from, remaining);
        let credited = add(self.balance_of(to), amount)?;
        self.balances.insert(to, credited);
        Ok(())
    }

    pub(crate) fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Deduct `amount` from `spender`'s allowance over `owner`
    ///
    /// Owners spend their own balance freely and a `U256::MAX` allowance never
    /// decreases.
    pub(crate) fn spend_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        if owner == spender {
            return Ok(());
        }
        let allowance = self.allowance(owner, spender);
        if allowance == U256::MAX {
            return Ok(());
        }
        if allowance < amount {
            return Err(PairError::InsufficientAllowance { allowance, amount });
        }
        self.allowances.insert((owner, spender), allowance - amount);
        Ok(())
    }

    /// Return the current nonce and advance it
    pub(crate) fn use_nonce(&mut self, owner: Address) -> Result<U256> {
        let nonce = self.nonce(owner);
        self.nonces.insert(owner, add(nonce, U256::one())?);
        Ok(nonce)
    }

    fn debit(&self, holder: Address, amount: U256) -> Result<U256> {
        let balance = self.balance_of(holder);
        balance
            .checked_sub(amount)
            .ok_or(PairError::InsufficientBalance {
                holder,
                balance,
                amount,
            })
    }
}
