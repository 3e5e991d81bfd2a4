//! Session facade.

use mend_access::{AccessDescriptor, DescriptorLayout, RoleTier};
use mend_core::DocumentRef;
use mend_mutation::TransactionPlan;
use mend_planner::{BuildError, BuildResult, PlanBuilder};
use mend_store::DocumentStore;
use mend_transaction::{CommitReport, ExecutionOutcome, TransactionEngine};

use crate::config::Config;
use crate::error::SessionResult;

/// A store plus the configuration that governs planning and execution.
///
/// Sessions borrow the store, so several may share one store across threads.
pub struct Session<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    config: Config,
}

impl<'s, S: DocumentStore + ?Sized> Session<'s, S> {
    pub fn new(store: &'s S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A fresh builder limited to the configured plan size.
    pub fn builder(&self) -> PlanBuilder<'s, S> {
        PlanBuilder::new(self.store, self.config.engine.max_plan_steps)
    }

    pub fn engine(&self) -> TransactionEngine<'s, S> {
        TransactionEngine::new(self.store).with_config(self.config.engine.clone())
    }

    /// Read the sharing configuration stored on `doc`.
    pub fn descriptor<R: RoleTier>(
        &self,
        doc: &DocumentRef,
        layout: &DescriptorLayout,
    ) -> SessionResult<AccessDescriptor<R>> {
        let fields = self
            .store
            .get(doc)
            .map_err(BuildError::from)?
            .ok_or_else(|| BuildError::ResourceNotFound(doc.clone()))?;
        Ok(AccessDescriptor::from_document(&fields, layout))
    }

    pub fn execute(&self, plan: &TransactionPlan) -> ExecutionOutcome {
        self.engine().execute(plan)
    }

    /// Build a plan with `plan_fn` and execute it.
    ///
    /// Build errors are returned before anything is written.
    pub fn run<F>(&self, plan_fn: F) -> SessionResult<ExecutionOutcome>
    where
        F: FnOnce(&mut PlanBuilder<'s, S>) -> BuildResult<()>,
    {
        let mut builder = self.builder();
        plan_fn(&mut builder)?;
        let plan = builder.build()?;
        Ok(self.execute(&plan))
    }

    /// Like `run`, but a rolled-back outcome becomes an error.
    pub fn commit<F>(&self, plan_fn: F) -> SessionResult<CommitReport>
    where
        F: FnOnce(&mut PlanBuilder<'s, S>) -> BuildResult<()>,
    {
        Ok(self.run(plan_fn)?.into_result()?)
    }
}
