//! Money held by the party.
use serde::{Deserialize, Serialize};

/// Non-negative cash balance in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Purse {
    balance: u32,
}

impl Purse {
    #[must_use]
    pub const fn new(balance: u32) -> Self {
        Self { balance }
    }

    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Pay `cost` in full or not at all.
    pub const fn spend(&mut self, cost: u32) -> bool {
        if self.balance < cost {
            return false;
        }
        self.balance -= cost;
        true
    }

    /// Lose up to `amount`, stopping at zero. Returns what was actually lost.
    pub fn lose(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.balance);
        self.balance -= lost;
        lost
    }

    pub const fn earn(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}
