//! mend Transaction
//!
//! Compensating transactions over a store without multi-document atomicity.
//!
//! Responsibilities:
//! - Apply a plan's forward writes strictly in order
//! - Record each committed step with its resolved target and inverse
//! - On failure, compensate committed steps in reverse order, best effort
//! - Classify and report the outcome

mod config;
mod engine;
mod error;
mod outcome;
mod record;

pub use config::EngineConfig;
pub use engine::TransactionEngine;
pub use error::{TransactionError, TransactionResult};
pub use outcome::{CommitReport, ExecutionOutcome, RollbackReport, Severity, StepFailure};
pub use record::{ExecutionRecord, RecordEntry};
