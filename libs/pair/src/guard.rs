//! Re-entrancy guard
//!
//! One flag per pair. Every mutating entry point takes it for the duration of
//! the call; the swap callback runs while it is held, so any nested guarded
//! call from caller code fails with [`PairError::Reentrancy`].

use crate::error::{PairError, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.locked {
            return Err(PairError::Reentrancy);
        }
        self.locked = true;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.locked = false;
    }
}
