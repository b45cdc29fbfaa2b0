// ============================================================================
// txwrapper Library
// ============================================================================
//
// Runs caller-supplied work inside a database transaction: begin, run the
// work, then commit on success or roll back on failure. The database itself
// is an external collaborator reached through the `Database` trait; sqlx
// pools implement it.
//
// ============================================================================

//! Begin / work / commit-or-rollback for database transactions.
//!
//! ```no_run
//! use sqlx::SqlitePool;
//! use txwrapper::{Context, TxError, TxWrapper};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = SqlitePool::connect("sqlite:app.db").await?;
//! let runner = TxWrapper::new(pool.clone());
//!
//! let result = runner
//!     .run(&Context::background(), None, |_ctx, tx| {
//!         Box::pin(async move {
//!             sqlx::query("INSERT INTO email (email) VALUES (?)")
//!                 .bind("info@example.com")
//!                 .execute(tx.as_executor())
//!                 .await?;
//!             sqlx::query("INSERT INTO email (email) VALUES (?)")
//!                 .bind("info@example.com")
//!                 .execute(tx.as_executor())
//!                 .await?;
//!             Ok::<_, sqlx::Error>(())
//!         })
//!     })
//!     .await;
//!
//! match result {
//!     Ok(()) => println!("both rows committed"),
//!     Err(TxError::Work(err)) => println!("rolled back: {}", err),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod context;
pub mod core;
pub mod interface;
pub mod prelude;
pub mod transaction;

pub use connection::SqlxTransaction;
pub use context::{Context, ContextError};
pub use crate::core::{DbError, Result, TxError, TxErrorKind};
pub use interface::{Database, Transaction};
pub use transaction::{IsolationLevel, RunnerConfig, TxOptions, TxWrapper};
