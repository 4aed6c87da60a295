//! Account balance ledger.
//!
//! The ledger is owned by a single batch run and threaded through the
//! transfer loop by mutable reference.

use std::collections::HashMap;

/// Account number as it appears in the input files.
pub type AccountId = i64;

/// In-memory mapping of account number to balance.
///
/// # Invariants
///
/// - Keys are unique; setting an existing account replaces its balance
/// - The sum of balances is unchanged by any completed transfer
///
/// Balances are plain `f64`. No rounding is applied, so totals are only
/// conserved up to floating-point error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    balances: HashMap<AccountId, f64>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            balances: HashMap::new(),
        }
    }

    /// Returns the balance of `account`, or `None` if the account is unknown.
    pub fn get(&self, account: AccountId) -> Option<f64> {
        self.balances.get(&account).copied()
    }

    /// Sets the balance of `account`, inserting it if needed.
    pub fn set(&mut self, account: AccountId, balance: f64) {
        self.balances.insert(account, balance);
    }

    pub fn contains(&self, account: AccountId) -> bool {
        self.balances.contains_key(&account)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances.
    pub fn total(&self) -> f64 {
        self.balances.values().sum()
    }

    /// Entries sorted by account number ascending.
    pub fn entries_sorted(&self) -> Vec<(AccountId, f64)> {
        let mut entries: Vec<_> = self
            .balances
            .iter()
            .map(|(account, balance)| (*account, *balance))
            .collect();
        entries.sort_by_key(|(account, _)| *account);
        entries
    }
}

impl FromIterator<(AccountId, f64)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (AccountId, f64)>>(iter: I) -> Self {
        Ledger {
            balances: iter.into_iter().collect(),
        }
    }
}
