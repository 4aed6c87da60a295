//! Transfer Batch CLI
//!
//! Applies transfer requests to account balances and writes a transfer
//! report and a post-run balance snapshot into the output directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [--strict] balances.csv requests.csv reports/
//! ```
//!
//! `--strict` turns unreadable inputs and unknown accounts into fatal errors.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use std::env;
use std::process;
use transfer_batch::{BatchConfig, BatchError, BatchRunner, Result};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let (strict, paths): (Vec<String>, Vec<String>) =
        env::args().skip(1).partition(|arg| arg == "--strict");

    let [balances, requests, output_dir] = paths.as_slice() else {
        return Err(BatchError::MissingArgument);
    };

    let mut config = BatchConfig::new(balances, requests, output_dir);
    if !strict.is_empty() {
        config = config.strict();
    }

    let run = BatchRunner::new(config).run()?;

    if let Some(path) = &run.reports.transfer_report {
        println!("{}", path.display());
    }
    if let Some(path) = &run.reports.balance_report {
        println!("{}", path.display());
    }

    Ok(())
}
