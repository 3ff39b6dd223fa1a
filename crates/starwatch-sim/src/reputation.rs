//! Per-faction reputation balances.
//!
//! Reputation is spent like a currency. Balances never go below zero, and
//! factions the ledger has not been provisioned for behave as having no
//! account: reads give 0, debits fail, credits are dropped.

use serde::{Deserialize, Serialize};

use crate::factions::FactionId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReputationLedger {
    balances: Vec<f32>,
}

impl ReputationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger with a zero balance for each of the first `count` factions.
    pub fn with_factions(count: usize) -> Self {
        Self {
            balances: vec![0.0; count],
        }
    }

    /// Grow to cover at least `count` factions. Never shrinks.
    pub fn provision(&mut self, count: usize) {
        if self.balances.len() < count {
            self.balances.resize(count, 0.0);
        }
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    fn cell(&self, faction: FactionId) -> Option<&f32> {
        self.balances.get(faction.index() as usize)
    }

    fn cell_mut(&mut self, faction: FactionId) -> Option<&mut f32> {
        self.balances.get_mut(faction.index() as usize)
    }

    /// Current balance, 0 for unprovisioned factions.
    pub fn get(&self, faction: FactionId) -> f32 {
        self.cell(faction).copied().unwrap_or(0.0)
    }

    /// Debit `amount` if the balance covers it. Returns whether it did.
    pub fn take(&mut self, faction: FactionId, amount: f32) -> bool {
        match self.cell_mut(faction) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                true
            }
            _ => false,
        }
    }

    /// Credit `amount` (which may be negative), then clamp at zero.
    pub fn add(&mut self, faction: FactionId, amount: f32) {
        if let Some(balance) = self.cell_mut(faction) {
            *balance += amount;
            if balance.is_nan() || *balance < 0.0 {
                *balance = 0.0;
            }
        }
    }

    /// Debit up to `amount`, stopping at zero.
    pub fn remove(&mut self, faction: FactionId, amount: f32) {
        self.add(faction, -amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factions::FactionTable;

    fn two_factions() -> (FactionTable, FactionId) {
        let mut table = FactionTable::new();
        let navy = table.add_faction("Navy", "");
        (table, navy)
    }

    #[test]
    fn take_only_when_covered() {
        let (table, navy) = two_factions();
        let mut ledger = ReputationLedger::with_factions(table.len());
        ledger.add(navy, 100.0);

        assert!(!ledger.take(navy, 150.0));
        assert_eq!(ledger.get(navy), 100.0);

        assert!(ledger.take(navy, 50.0));
        assert_eq!(ledger.get(navy), 50.0);

        // Exact balance is enough.
        assert!(ledger.take(navy, 50.0));
        assert_eq!(ledger.get(navy), 0.0);
    }

    #[test]
    fn negative_add_clamps_to_zero() {
        let (table, navy) = two_factions();
        let mut ledger = ReputationLedger::with_factions(table.len());
        ledger.add(navy, 30.0);
        ledger.add(navy, -1000.0);
        assert_eq!(ledger.get(navy), 0.0);

        ledger.add(navy, 10.0);
        ledger.remove(navy, 4.0);
        assert_eq!(ledger.get(navy), 6.0);
        ledger.remove(navy, 100.0);
        assert_eq!(ledger.get(navy), 0.0);
    }

    #[test]
    fn nan_credit_cannot_poison_balance() {
        let (table, navy) = two_factions();
        let mut ledger = ReputationLedger::with_factions(table.len());
        ledger.add(navy, f32::NAN);
        assert_eq!(ledger.get(navy), 0.0);
    }

    #[test]
    fn unprovisioned_faction_has_no_account() {
        let (table, navy) = two_factions();
        // Ledger sized for the neutral faction only.
        let mut ledger = ReputationLedger::with_factions(1);

        assert_eq!(ledger.get(navy), 0.0);
        assert!(!ledger.take(navy, 0.0));
        ledger.add(navy, 500.0);
        assert_eq!(ledger.get(navy), 0.0);

        ledger.provision(table.len());
        ledger.add(navy, 500.0);
        assert_eq!(ledger.get(navy), 500.0);
    }

    #[test]
    fn provision_never_shrinks() {
        let mut ledger = ReputationLedger::with_factions(4);
        ledger.add(FactionId::NEUTRAL, 7.0);
        ledger.provision(2);
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.get(FactionId::NEUTRAL), 7.0);
    }
}
