//! Loaders for the two headerless CSV input resources.
//!
//! A malformed line fails the whole load. Whether a failed load aborts the
//! run or degrades to an empty collection is decided by the batch runner.

use crate::error::{BatchError, Result};
use crate::ledger::Ledger;
use crate::transfer::{BalanceRecord, TransferRecord, TransferRequest};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Loads a ledger from `accountId,balance` lines.
///
/// A repeated account number replaces the earlier balance.
pub fn load_balances<R: Read>(reader: R) -> Result<Ledger> {
    let mut ledger = Ledger::new();

    read_records(reader, 2, |row, record: BalanceRecord| {
        let (account, balance) = record.parse().ok_or_else(|| BatchError::InvalidRecord {
            row,
            message: format!("invalid balance {:?}", record.balance),
        })?;
        debug!("Line {}: account {} balance {}", row, account, balance);
        ledger.set(account, balance);
        Ok(())
    })?;

    Ok(ledger)
}

/// Loads transfer requests from `fromAccount,toAccount,amount` lines, in file
/// order.
pub fn load_requests<R: Read>(reader: R) -> Result<Vec<TransferRequest>> {
    let mut requests = Vec::new();

    read_records(reader, 3, |row, record: TransferRecord| {
        let request = record.parse().ok_or_else(|| BatchError::InvalidRecord {
            row,
            message: format!("invalid amount {:?}", record.amount),
        })?;
        debug!(
            "Line {}: request {} -> {} amount {}",
            row, request.from_account, request.to_account, request.amount
        );
        requests.push(request);
        Ok(())
    })?;

    Ok(requests)
}

pub fn load_balances_from_path<P: AsRef<Path>>(path: P) -> Result<Ledger> {
    load_balances(BufReader::new(File::open(path)?))
}

pub fn load_requests_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TransferRequest>> {
    load_requests(BufReader::new(File::open(path)?))
}

/// Reads every line as a `T`, handing each to `handle` with its 1-based line
/// number. Empty lines are skipped by the CSV reader.
fn read_records<R, T, F>(reader: R, fields: usize, mut handle: F) -> Result<()>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(usize, T) -> Result<()>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut raw = StringRecord::new();
    while csv_reader.read_record(&mut raw)? {
        let row = raw.position().map(|p| p.line() as usize).unwrap_or(0);

        if raw.len() != fields {
            return Err(BatchError::InvalidRecord {
                row,
                message: format!("expected {} fields, found {}", fields, raw.len()),
            });
        }

        let record: T = raw
            .deserialize(None)
            .map_err(|e| BatchError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;

        handle(row, record)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_balances() {
        let csv = "1111234522226789,5000.00\n1111234522221234,10000.00\n";
        let ledger = load_balances(Cursor::new(csv)).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(1111234522226789), Some(5000.0));
        assert_eq!(ledger.get(1111234522221234), Some(10000.0));
    }

    #[test]
    fn test_load_requests_preserves_order() {
        let csv = "1,2,10.0\n2,3,20.5\n3,1,0.25";
        let requests = load_requests(Cursor::new(csv)).unwrap();

        assert_eq!(
            requests,
            vec![
                TransferRequest::new(1, 2, 10.0),
                TransferRequest::new(2, 3, 20.5),
                TransferRequest::new(3, 1, 0.25),
            ]
        );
    }

    #[test]
    fn test_whitespace_and_blank_lines() {
        let csv = " 1 , 2 , 10.0 \n\n 2, 1,5\n";
        let requests = load_requests(Cursor::new(csv)).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1], TransferRequest::new(2, 1, 5.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(load_balances(Cursor::new("")).unwrap().is_empty());
        assert!(load_requests(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_amount_reports_line() {
        let csv = "1,2,10.0\n1,2,ten\n";
        let err = load_requests(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRecord { row: 2, .. }));
    }

    #[test]
    fn test_malformed_account_number() {
        let csv = "abc,10.0\n";
        let err = load_balances(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = load_balances(Cursor::new("1,2,3\n")).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRecord { row: 1, .. }));

        let err = load_requests(Cursor::new("1,2\n")).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_balances_from_path("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }
}
