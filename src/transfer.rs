//! Transfer models for CSV parsing and reporting.

use crate::ledger::AccountId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Date-time pattern shared by report filenames and the TIMESTAMP column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Raw balance line as read from CSV: `accountId,balance`.
#[derive(Debug, Deserialize)]
pub struct BalanceRecord {
    pub account: AccountId,
    pub balance: String,
}

impl BalanceRecord {
    /// Returns `None` if the balance is not a finite number.
    pub fn parse(&self) -> Option<(AccountId, f64)> {
        Some((self.account, parse_amount(&self.balance)?))
    }
}

/// Raw transfer request line as read from CSV: `fromAccount,toAccount,amount`.
#[derive(Debug, Deserialize)]
pub struct TransferRecord {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: String,
}

impl TransferRecord {
    /// Parses the raw CSV record into a request.
    ///
    /// The amount is expected to be positive but this is not checked.
    pub fn parse(&self) -> Option<TransferRequest> {
        Some(TransferRequest::new(
            self.from,
            self.to,
            parse_amount(&self.amount)?,
        ))
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An instruction to move `amount` from one account to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferRequest {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: f64,
}

impl TransferRequest {
    pub fn new(from_account: AccountId, to_account: AccountId, amount: f64) -> Self {
        TransferRequest {
            from_account,
            to_account,
            amount,
        }
    }
}

/// Outcome of a single transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Funds moved.
    Completed,

    /// Insufficient funds or unknown account; the ledger was not touched.
    Denied,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Completed => "COMPLETED",
            Outcome::Denied => "DENIED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of one transfer attempt, created exactly once per request.
///
/// For a completed transfer the balances are the post-transfer values; for a
/// denied one they are the balances observed before the attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferResult {
    pub request: TransferRequest,
    pub outcome: Outcome,
    pub from_balance_after: f64,
    pub to_balance_after: f64,
    pub timestamp: DateTime<Utc>,
}

impl TransferResult {
    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    /// CSV row: from, to, amount, status, timestamp.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.request.from_account.to_string(),
            self.request.to_account.to_string(),
            format_amount(self.request.amount),
            self.outcome.name().to_string(),
            format_timestamp(&self.timestamp),
        ]
    }
}

/// Formats an amount the way the reference reports render doubles.
///
/// Magnitudes in `[1e-3, 1e7)` use plain decimal notation with at least one
/// fractional digit (`80.0`, `100.5`). Anything else uses scientific
/// notation with a capital `E` (`1.0E7`, `2.5E-4`). Digits are always the
/// shortest form that round-trips.
pub fn format_amount(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        with_fraction(format!("{}", value))
    } else {
        let scientific = format!("{:e}", value);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                format!("{}E{}", with_fraction(mantissa.to_string()), exponent)
            }
            None => scientific,
        }
    }
}

/// Appends `.0` to integral digits; `inf` and `NaN` pass through.
fn with_fraction(digits: String) -> String {
    if digits.contains('.') || !digits.ends_with(|c: char| c.is_ascii_digit()) {
        digits
    } else {
        digits + ".0"
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_transfer_record() {
        let record = TransferRecord {
            from: 1234567981234568,
            to: 9876543219876548,
            amount: "80.0".to_string(),
        };

        let request = record.parse().unwrap();
        assert_eq!(request.from_account, 1234567981234568);
        assert_eq!(request.to_account, 9876543219876548);
        assert_eq!(request.amount, 80.0);
    }

    #[test]
    fn test_parse_handles_whitespace() {
        let record = BalanceRecord {
            account: 1,
            balance: "  100.5  ".to_string(),
        };
        assert_eq!(record.parse(), Some((1, 100.5)));
    }

    #[test]
    fn test_parse_rejects_bad_amounts() {
        for raw in ["", "abc", "NaN", "inf", "1.2.3"] {
            let record = TransferRecord {
                from: 1,
                to: 2,
                amount: raw.to_string(),
            };
            assert!(record.parse().is_none(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_negative_amount_is_not_validated() {
        let record = TransferRecord {
            from: 1,
            to: 2,
            amount: "-5".to_string(),
        };
        assert_eq!(record.parse().unwrap().amount, -5.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(80.0), "80.0");
        assert_eq!(format_amount(100.5), "100.5");
        assert_eq!(format_amount(0.0), "0.0");
        assert_eq!(format_amount(-3.0), "-3.0");
        assert_eq!(format_amount(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_amount(-0.0), "-0.0");
    }

    #[test]
    fn test_format_amount_switches_to_scientific() {
        assert_eq!(format_amount(9999999.5), "9999999.5");
        assert_eq!(format_amount(1e7), "1.0E7");
        assert_eq!(format_amount(12345678.9), "1.23456789E7");
        assert_eq!(format_amount(1e16), "1.0E16");
        assert_eq!(format_amount(0.001), "0.001");
        assert_eq!(format_amount(0.0001), "1.0E-4");
        assert_eq!(format_amount(-2.5e-4), "-2.5E-4");
    }

    #[test]
    fn test_format_timestamp_uses_24_hour_clock() {
        let ts = Utc.with_ymd_and_hms(2023, 7, 4, 15, 5, 9).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-07-04T15-05-09");
    }

    #[test]
    fn test_result_row() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let result = TransferResult {
            request: TransferRequest::new(1, 2, 80.0),
            outcome: Outcome::Completed,
            from_balance_after: 20.5,
            to_balance_after: 128.0,
            timestamp: ts,
        };

        assert!(result.is_completed());
        assert_eq!(
            result.to_row(),
            ["1", "2", "80.0", "COMPLETED", "2023-01-02T03-04-05"].map(String::from)
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Completed.to_string(), "COMPLETED");
        assert_eq!(Outcome::Denied.to_string(), "DENIED");
    }
}
