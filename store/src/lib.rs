//! mend Document Store
//!
//! This crate provides the document store capability the engine consumes:
//! - `DocumentStore`: get/set/update/delete/add plus field queries
//! - `MemoryStore`: in-memory store with a field index, used as a test double
//! - `FaultyStore`: wrapper that injects write failures and logs every write

mod adapter;
mod fault;
mod index;
mod memory;

pub use adapter::*;
pub use fault::{FaultRule, FaultyStore, WriteRecord};
pub use memory::MemoryStore;
