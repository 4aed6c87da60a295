//! CSV report writers.
//!
//! Each run produces two files in the output directory, both suffixed with
//! the run timestamp: the transfer report and the post-run balance snapshot.

use crate::error::{BatchError, Result};
use crate::ledger::Ledger;
use crate::transfer::{format_amount, format_timestamp, TransferResult};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const TRANSFER_REPORT_HEADER: [&str; 5] =
    ["FROM ACCOUNT", "TO ACCOUNT", "AMOUNT", "STATUS", "TIMESTAMP"];
pub const BALANCE_REPORT_HEADER: [&str; 2] = ["ACCOUNT NUMBER", "BALANCE"];

const TRANSFER_REPORT_PREFIX: &str = "transfer_run_";
const BALANCE_REPORT_PREFIX: &str = "acc_balance_post_run_";

/// Writes one row per result, in the order given.
pub fn write_transfer_report<W: Write>(results: &[TransferResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(TRANSFER_REPORT_HEADER)?;
    for result in results {
        csv_writer.write_record(result.to_row())?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes one row per ledger entry, sorted by account number.
pub fn write_balance_report<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(BALANCE_REPORT_HEADER)?;
    for (account, balance) in ledger.entries_sorted() {
        csv_writer.write_record([account.to_string(), format_amount(balance)])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Locations of the files written for one run. A `None` entry means that
/// report could not be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPaths {
    pub transfer_report: Option<PathBuf>,
    pub balance_report: Option<PathBuf>,
}

/// Writes report files into an output directory.
#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: PathBuf,
}

impl Reporter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Reporter {
            output_dir: output_dir.into(),
        }
    }

    /// Path of the transfer report for a run started at `run_at`.
    pub fn transfer_report_path(&self, run_at: &DateTime<Utc>) -> PathBuf {
        self.report_path(TRANSFER_REPORT_PREFIX, run_at)
    }

    /// Path of the balance report for a run started at `run_at`.
    pub fn balance_report_path(&self, run_at: &DateTime<Utc>) -> PathBuf {
        self.report_path(BALANCE_REPORT_PREFIX, run_at)
    }

    /// Writes both reports.
    ///
    /// Failures are logged and do not stop the other report from being
    /// written. Nothing is retried.
    pub fn publish(
        &self,
        results: &[TransferResult],
        ledger: &Ledger,
        run_at: &DateTime<Utc>,
    ) -> ReportPaths {
        if let Err(e) = fs::create_dir_all(&self.output_dir) {
            error!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            );
        }

        ReportPaths {
            transfer_report: self.write_file(self.transfer_report_path(run_at), |file| {
                write_transfer_report(results, file)
            }),
            balance_report: self.write_file(self.balance_report_path(run_at), |file| {
                write_balance_report(ledger, file)
            }),
        }
    }

    /// Writes a report to `path`, or to `<stem>_<n>.csv` if earlier runs in
    /// the same second already took that name. A file whose write fails is
    /// removed again.
    fn write_file<F>(&self, path: PathBuf, write: F) -> Option<PathBuf>
    where
        F: FnOnce(BufWriter<fs::File>) -> Result<()>,
    {
        let (path, file) = match create_unique(&path) {
            Ok(created) => created,
            Err(e) => {
                error!("Failed to save CSV file {}: {}", path.display(), e);
                return None;
            }
        };

        match write(BufWriter::new(file)) {
            Ok(()) => {
                info!("Wrote report {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to save CSV file {}: {}", path.display(), e);
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove partial file {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    fn report_path(&self, prefix: &str, run_at: &DateTime<Utc>) -> PathBuf {
        let path = self
            .output_dir
            .join(format!("{}{}.csv", prefix, format_timestamp(run_at)));
        PathBuf::from(path.to_string_lossy().replace(':', "-"))
    }
}

/// Upper bound on `_<n>` suffixes tried for one report name.
const MAX_NAME_SUFFIX: usize = 1000;

/// Creates the first free name among `path`, `<stem>_1.csv`, `<stem>_2.csv`...
fn create_unique(path: &Path) -> Result<(PathBuf, fs::File)> {
    for n in 0..=MAX_NAME_SUFFIX {
        let candidate = suffixed(path, n);
        match create_new(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(BatchError::ReportExists { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(BatchError::ReportExists {
        path: path.display().to_string(),
    })
}

fn suffixed(path: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return path.to_path_buf();
    }
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{}_{}.csv", stem, n))
}

/// Opens `path` for writing, refusing to replace an existing file.
fn create_new(path: &Path) -> Result<fs::File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => BatchError::ReportExists {
                path: path.display().to_string(),
            },
            _ => BatchError::Io(e),
        })
}
