//! Pool-share token surface and fee claims
//!
//! Every balance move synchronizes the reward state of both parties first,
//! so fees earned up to that moment stay with whoever held the shares.

use super::Pair;
use crate::error::{PairError, Result};
use crate::events::PairEvent;
use crate::host::Host;
use crate::permit::{permit_digest, recover_signer, PermitMessage};
use ethers_core::types::{Address, U256};
use tracing::info;

impl Pair {
    pub fn transfer<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.guarded(host, "transfer", |pair, _| {
            pair.transfer_shares(caller, to, amount)
        })
    }

    /// Move `from`'s shares on behalf of `caller`, spending its allowance
    pub fn transfer_from<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.guarded(host, "transfer_from", |pair, _| {
            pair.state.shares.spend_allowance(from, caller, amount)?;
            pair.transfer_shares(from, to, amount)
        })
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.state.shares.approve(owner, spender, amount);
        self.emit(PairEvent::Approval {
            owner,
            spender,
            amount,
        });
    }

    /// Approve through an owner-signed EIP-712 message
    ///
    /// Consumes the owner's current nonce, so a message is valid once.
    pub fn permit<H: Host>(&mut self, host: &H, message: &PermitMessage) -> Result<()> {
        let now = host.block_timestamp();
        if message.deadline < U256::from(now) {
            return Err(PairError::Expired {
                deadline: message.deadline,
                now,
            });
        }

        let digest = permit_digest(
            self.meta.domain_separator,
            message.owner,
            message.spender,
            message.value,
            self.state.shares.nonce(message.owner),
            message.deadline,
        );
        let signer = recover_signer(&message.signature, digest)?;
        if signer != message.owner {
            return Err(PairError::InvalidSignature);
        }

        self.state.shares.use_nonce(message.owner)?;
        self.approve(message.owner, message.spender, message.value);
        Ok(())
    }

    /// Pay `caller` every fee it has accrued, from the collector's balance
    pub fn claim_fees<H: Host>(&mut self, host: &mut H, caller: Address) -> Result<(U256, U256)> {
        self.guarded(host, "claim_fees", |pair, host| {
            pair.pull_fees()?;
            pair.sync_holder(caller)?;

            let (claimed0, claimed1) = pair.state.rewards.take_claimable(caller);
            if claimed0.is_zero() && claimed1.is_zero() {
                return Ok((claimed0, claimed1));
            }

            let collector = pair.state.collector.address();
            if !claimed0.is_zero() {
                host.transfer(pair.meta.token0, collector, caller, claimed0)?;
            }
            if !claimed1.is_zero() {
                host.transfer(pair.meta.token1, collector, caller, claimed1)?;
            }

            pair.emit(PairEvent::Claim {
                recipient: caller,
                amount0: claimed0,
                amount1: claimed1,
            });
            info!(
                "{:?} claimed fees {} / {} from {}",
                caller, claimed0, claimed1, pair.meta.symbol
            );
            Ok((claimed0, claimed1))
        })
    }

    fn transfer_shares(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        self.sync_holder(from)?;
        self.sync_holder(to)?;
        self.state.shares.move_balance(from, to, amount)?;
        self.emit(PairEvent::Transfer { from, to, amount });
        Ok(())
    }
}
