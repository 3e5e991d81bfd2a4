//! Transaction engine for executing compensating transactions.

use mend_core::{DocumentRef, StoreError};
use mend_mutation::ops::{apply_compensation, apply_forward, compensation_holds};
use mend_mutation::{Bindings, MutationError, MutationResult, TransactionPlan};
use mend_store::DocumentStore;
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::outcome::{CommitReport, ExecutionOutcome, RollbackReport, StepFailure};
use crate::record::{ExecutionRecord, RecordEntry};

/// Executes plans against a borrowed store.
///
/// Changes are applied directly to the store and tracked in an
/// `ExecutionRecord`; there is no isolation between concurrent plans.
/// Once `execute` starts it runs to commit or to the end of rollback.
pub struct TransactionEngine<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    config: EngineConfig,
}

impl<'s, S: DocumentStore + ?Sized> TransactionEngine<'s, S> {
    /// Create an engine with the default configuration.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Execute a plan.
    pub fn execute(&self, plan: &TransactionPlan) -> ExecutionOutcome {
        let mut record = ExecutionRecord::new();
        let mut bindings = Bindings::new();

        for (index, step) in plan.iter() {
            debug!(step = index, op = %step, "applying forward write");
            match apply_forward(self.store, index, step, &bindings) {
                Ok(target) => {
                    bindings.bind(index, target.clone());
                    record.commit(index, step.kind, target, step.compensation.clone());
                }
                Err(e) => {
                    warn!(
                        step = index,
                        op = %step,
                        error = %e,
                        "forward write failed, rolling back"
                    );
                    let failure = StepFailure {
                        index,
                        kind: step.kind,
                        target: bindings
                            .resolve_target(index, &step.target)
                            .map(|doc| doc.to_string())
                            .unwrap_or_else(|_| step.target.to_string()),
                        error: e,
                    };
                    return self.rollback(&record, failure);
                }
            }
        }

        info!(steps = plan.len(), "plan committed");
        ExecutionOutcome::Committed(CommitReport {
            bindings,
            steps: plan.len(),
        })
    }

    /// Compensate every committed step, most recent first.
    fn rollback(&self, record: &ExecutionRecord, failure: StepFailure) -> ExecutionOutcome {
        let mut compensated = Vec::with_capacity(record.len());
        let mut failed = Vec::new();

        for entry in record.rollback_order() {
            compensated.push(entry.index);
            // Keep going past a failure: each entry is an independent document.
            if let Err(e) = self.compensate(entry) {
                warn!(
                    step = entry.index,
                    target = %entry.target,
                    error = %e,
                    "compensation failed"
                );
                failed.push(StepFailure {
                    index: entry.index,
                    kind: entry.kind,
                    target: entry.target.to_string(),
                    error: e,
                });
            } else {
                debug!(step = entry.index, target = %entry.target, "compensated");
            }
        }

        let report = RollbackReport {
            failure,
            compensated,
            failed_compensations: failed,
        };

        if report.failed_compensations.is_empty() {
            warn!(failed_step = report.failure.index, "plan rolled back");
            ExecutionOutcome::RolledBack(report)
        } else {
            for failure in &report.failed_compensations {
                error!(
                    step = failure.index,
                    target = %failure.target,
                    "document may be inconsistent after rollback"
                );
            }
            ExecutionOutcome::PartiallyRolledBack(report)
        }
    }

    fn compensate(&self, entry: &RecordEntry) -> MutationResult<()> {
        apply_compensation(self.store, &entry.target, &entry.compensation)?;
        if self.config.verify_compensations
            && !compensation_holds(self.store, &entry.target, &entry.compensation)?
        {
            return Err(MutationError::Store(not_restored(&entry.target)));
        }
        Ok(())
    }
}

fn not_restored(target: &DocumentRef) -> StoreError {
    StoreError::unavailable("verify", target.to_string(), "document not restored")
}
