//! Transfer application engine.
//!
//! Applies one transfer request at a time to a ledger, enforcing the
//! sufficient-funds rule. The engine keeps no state between calls; the only
//! thing it owns is the clock used to stamp results.

use crate::error::{BatchError, Result};
use crate::ledger::Ledger;
use crate::transfer::{format_amount, Outcome, TransferRequest, TransferResult};
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Source of result timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Applies transfer requests to a ledger.
#[derive(Debug, Clone, Copy)]
pub struct TransferEngine {
    clock: Clock,
}

impl TransferEngine {
    /// Creates an engine stamping results with the current UTC time.
    pub fn new() -> Self {
        TransferEngine { clock: Utc::now }
    }

    /// Creates an engine with a custom clock.
    pub fn with_clock(clock: Clock) -> Self {
        TransferEngine { clock }
    }

    /// Attempts a single transfer.
    ///
    /// The transfer is denied when `amount` is strictly greater than the
    /// source balance; an exact match drains the account to zero. Both new
    /// balances are computed from the same pre-transfer snapshot, and a
    /// self-transfer leaves the ledger entry untouched.
    ///
    /// Returns [`BatchError::UnknownAccount`] if either account is missing
    /// from the ledger. The ledger is not modified in that case.
    pub fn attempt_transfer(
        &self,
        request: &TransferRequest,
        ledger: &mut Ledger,
    ) -> Result<TransferResult> {
        let from_balance = ledger
            .get(request.from_account)
            .ok_or(BatchError::UnknownAccount {
                account: request.from_account,
            })?;
        let to_balance = ledger
            .get(request.to_account)
            .ok_or(BatchError::UnknownAccount {
                account: request.to_account,
            })?;

        if request.amount > from_balance {
            warn!(
                "Transfer denied: insufficient funds on account {} (balance {}, requested {})",
                request.from_account,
                format_amount(from_balance),
                format_amount(request.amount)
            );
            return Ok(self.result(request, Outcome::Denied, from_balance, to_balance));
        }

        let (new_from, new_to) = if request.from_account == request.to_account {
            (from_balance, to_balance)
        } else {
            let new_from = from_balance - request.amount;
            let new_to = to_balance + request.amount;
            ledger.set(request.from_account, new_from);
            ledger.set(request.to_account, new_to);
            (new_from, new_to)
        };

        info!(
            "Transfer completed from account {} to account {}, amount {}",
            request.from_account,
            request.to_account,
            format_amount(request.amount)
        );

        Ok(self.result(request, Outcome::Completed, new_from, new_to))
    }

    /// Builds a denial for a request that references an unknown account.
    ///
    /// Known balances are reported as-is, missing ones as zero. The ledger is
    /// only read.
    pub fn deny_unknown(&self, request: &TransferRequest, ledger: &Ledger) -> TransferResult {
        let from_balance = ledger.get(request.from_account).unwrap_or(0.0);
        let to_balance = ledger.get(request.to_account).unwrap_or(0.0);
        self.result(request, Outcome::Denied, from_balance, to_balance)
    }

    fn result(
        &self,
        request: &TransferRequest,
        outcome: Outcome,
        from_balance_after: f64,
        to_balance_after: f64,
    ) -> TransferResult {
        TransferResult {
            request: *request,
            outcome,
            from_balance_after,
            to_balance_after,
            timestamp: (self.clock)(),
        }
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}
