// ============================================================================
// Transaction Module
// ============================================================================
//
// The transaction runner and the options/configuration it is driven by.
//
// ============================================================================

pub mod config;
pub mod options;
pub mod runner;

pub use config::RunnerConfig;
pub use options::{IsolationLevel, TxOptions};
pub use runner::TxWrapper;
