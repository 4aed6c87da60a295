//! # Transfer Batch
//!
//! A single-pass batch processor that applies account-to-account transfer
//! requests to a balance snapshot and writes CSV audit reports.
//!
//! ## Design Principles
//!
//! - **Sequential processing**: requests are applied strictly in input order
//! - **Sufficient funds**: a transfer is denied only if the amount is
//!   strictly greater than the source balance
//! - **One result per request**: the report lines up 1:1 with the input
//! - **Owned state**: the ledger is a plain value threaded through the run
//!
//! Balances are `f64` and no rounding is applied. A real money system should
//! use integer minor units or a fixed-point decimal instead.
//!
//! ## Example
//!
//! ```
//! use transfer_batch::{Ledger, Outcome, TransferEngine, TransferRequest};
//!
//! let mut ledger: Ledger = [(1, 100.5), (2, 48.0)].into_iter().collect();
//! let engine = TransferEngine::new();
//!
//! let result = engine
//!     .attempt_transfer(&TransferRequest::new(1, 2, 80.0), &mut ledger)
//!     .unwrap();
//! assert_eq!(result.outcome, Outcome::Completed);
//! assert_eq!(ledger.get(1), Some(20.5));
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod input;
pub mod ledger;
pub mod report;
pub mod transfer;

pub use batch::{BatchConfig, BatchRun, BatchRunner, LoadFailurePolicy, UnknownAccountPolicy};
pub use engine::TransferEngine;
pub use error::{BatchError, Result};
pub use ledger::{AccountId, Ledger};
pub use report::{ReportPaths, Reporter};
pub use transfer::{Outcome, TransferRequest, TransferResult};
