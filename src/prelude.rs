//! Everything needed to run work in a transaction.
//!
//! ```
//! use txwrapper::prelude::*;
//! ```

pub use crate::context::{Context, ContextError};
pub use crate::core::{DbError, TxError, TxErrorKind};
pub use crate::interface::{Database, Transaction};
pub use crate::transaction::{IsolationLevel, RunnerConfig, TxOptions, TxWrapper};
pub use futures::future::BoxFuture;
