//! mend Session
//!
//! Wires a store, configuration, the planner and the engine together.
//!
//! Responsibilities:
//! - Load configuration from TOML with `MEND_` environment overrides
//! - Initialise logging
//! - Build and execute plans per request

mod config;
mod error;
mod logging;
mod session;

pub use config::{apply_env_overrides, apply_overrides, Config, LogFormat, LoggingConfig};
pub use error::{SessionError, SessionResult};
pub use logging::init_logging;
pub use session::Session;
