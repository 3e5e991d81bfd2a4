//! mend Core Types
//!
//! This crate provides the foundational types used throughout mend:
//! - Document identity (DocumentRef)
//! - Value types (the Value enum stored in document fields)
//! - Field maps for full documents and partial patches
//! - Common store error types

mod document;
mod error;
mod value;

pub use document::*;
pub use error::*;
pub use value::*;
