//! Batch orchestration.
//!
//! Loads the ledger and the request list, applies every request in input
//! order through the [`TransferEngine`], and hands the results and the final
//! ledger to the [`Reporter`].

use crate::engine::TransferEngine;
use crate::error::{BatchError, Result};
use crate::input::{load_balances_from_path, load_requests_from_path};
use crate::ledger::Ledger;
use crate::report::{ReportPaths, Reporter};
use crate::transfer::{TransferRequest, TransferResult};
use chrono::Utc;
use log::{error, info, warn};
use std::path::PathBuf;

/// What to do when an input file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFailurePolicy {
    /// Log the error and continue with an empty collection.
    #[default]
    Empty,

    /// Fail the run.
    Abort,
}

/// What to do when a request references an account not in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownAccountPolicy {
    /// Record the request as denied and carry on.
    #[default]
    Deny,

    /// Fail the run before any report is written.
    Abort,
}

/// Inputs, output location and failure policies for one run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub balances_path: PathBuf,
    pub requests_path: PathBuf,
    pub output_dir: PathBuf,
    pub on_load_failure: LoadFailurePolicy,
    pub on_unknown_account: UnknownAccountPolicy,
}

impl BatchConfig {
    /// Creates a config with the lenient default policies.
    pub fn new<B, R, O>(balances_path: B, requests_path: R, output_dir: O) -> Self
    where
        B: Into<PathBuf>,
        R: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        BatchConfig {
            balances_path: balances_path.into(),
            requests_path: requests_path.into(),
            output_dir: output_dir.into(),
            on_load_failure: LoadFailurePolicy::default(),
            on_unknown_account: UnknownAccountPolicy::default(),
        }
    }

    pub fn with_load_failure_policy(mut self, policy: LoadFailurePolicy) -> Self {
        self.on_load_failure = policy;
        self
    }

    pub fn with_unknown_account_policy(mut self, policy: UnknownAccountPolicy) -> Self {
        self.on_unknown_account = policy;
        self
    }

    /// Selects `Abort` for every policy.
    pub fn strict(self) -> Self {
        self.with_load_failure_policy(LoadFailurePolicy::Abort)
            .with_unknown_account_policy(UnknownAccountPolicy::Abort)
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// One result per request, in request order.
    pub results: Vec<TransferResult>,

    /// Ledger after the last request.
    pub ledger: Ledger,

    /// Files written for this run.
    pub reports: ReportPaths,
}

impl BatchRun {
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_completed()).count()
    }

    pub fn denied(&self) -> usize {
        self.results.len() - self.completed()
    }
}

/// Runs one batch from files on disk.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: BatchConfig,
    engine: TransferEngine,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        BatchRunner {
            config,
            engine: TransferEngine::new(),
        }
    }

    /// Replaces the engine, e.g. to pin the clock.
    pub fn with_engine(mut self, engine: TransferEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Executes the batch.
    ///
    /// Load and write failures are logged rather than returned. An error is
    /// returned only when a policy is set to `Abort`; report writing is
    /// never attempted in that case.
    pub fn run(&self) -> Result<BatchRun> {
        info!("Starting batch");
        let run_at = Utc::now();

        let mut ledger = self.load(
            "balances",
            load_balances_from_path(&self.config.balances_path),
        )?;
        let requests = self.load(
            "requests",
            load_requests_from_path(&self.config.requests_path),
        )?;

        let opening_total = ledger.total();
        info!(
            "Loaded {} accounts (total {}) and {} transfer requests",
            ledger.len(),
            opening_total,
            requests.len()
        );

        let results = self.apply_all(&requests, &mut ledger)?;

        let reports = Reporter::new(&self.config.output_dir).publish(&results, &ledger, &run_at);

        let run = BatchRun {
            results,
            ledger,
            reports,
        };
        info!(
            "Finished batch: {} completed, {} denied, total {} -> {}",
            run.completed(),
            run.denied(),
            opening_total,
            run.ledger.total()
        );

        Ok(run)
    }

    /// Applies `requests` to `ledger` sequentially, returning one result per
    /// request in the same order.
    pub fn apply_all(
        &self,
        requests: &[TransferRequest],
        ledger: &mut Ledger,
    ) -> Result<Vec<TransferResult>> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = match self.engine.attempt_transfer(request, ledger) {
                Ok(result) => result,
                Err(BatchError::UnknownAccount { account })
                    if self.config.on_unknown_account == UnknownAccountPolicy::Deny =>
                {
                    warn!(
                        "Transfer denied: account {} not found ({} -> {})",
                        account, request.from_account, request.to_account
                    );
                    self.engine.deny_unknown(request, ledger)
                }
                Err(e) => return Err(e),
            };
            results.push(result);
        }

        Ok(results)
    }

    fn load<T: Default>(&self, what: &str, loaded: Result<T>) -> Result<T> {
        match loaded {
            Ok(value) => Ok(value),
            Err(e) => match self.config.on_load_failure {
                LoadFailurePolicy::Empty => {
                    error!("Failed to load {}: {}; continuing with none", what, e);
                    Ok(T::default())
                }
                LoadFailurePolicy::Abort => Err(e),
            },
        }
    }
}
