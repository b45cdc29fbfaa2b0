// ============================================================================
// Transaction Runner
// ============================================================================
//
// Runs a unit of work inside a single transaction:
//
//   begin ──> work ──ok──> commit
//               │
//               └──err──> rollback
//
// Exactly one of commit/rollback is attempted once begin has succeeded, and
// the handle is consumed by it, so no transaction outlives `run`.
//
// ============================================================================

use super::{RunnerConfig, TxOptions};
use crate::context::Context;
use crate::core::TxError;
use crate::interface::{Database, Transaction};
use futures::future::BoxFuture;
use std::fmt;
use tracing::{Instrument, Level, event, info_span};

/// Executes caller-supplied work inside a database transaction.
///
/// The runner borrows the database handle; it never closes it. Pools are
/// cheap to clone, so a runner is usually built from a clone of the
/// application's pool.
///
/// # Examples
///
/// ```no_run
/// use sqlx::SqlitePool;
/// use txwrapper::{Context, TxWrapper};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite::memory:").await?;
/// let runner = TxWrapper::new(pool);
///
/// runner
///     .run(&Context::background(), None, |_ctx, tx| {
///         Box::pin(async move {
///             sqlx::query("INSERT INTO email (email) VALUES (?)")
///                 .bind("info@example.com")
///                 .execute(tx.as_executor())
///                 .await?;
///             Ok::<_, sqlx::Error>(())
///         })
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TxWrapper<D> {
    db: D,
    config: RunnerConfig,
}

impl<D: Database> TxWrapper<D> {
    /// Create a runner with the default configuration
    pub fn new(db: D) -> Self {
        Self::with_config(db, RunnerConfig::default())
    }

    pub fn with_config(db: D, config: RunnerConfig) -> Self {
        Self { db, config }
    }

    /// The database handle, for work that does not need a transaction
    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `work` inside a new transaction.
    ///
    /// `options` of `None` falls back to the configured default options. On
    /// success the transaction is committed and the work's value returned.
    /// On failure the transaction is rolled back and the work's error is
    /// returned unchanged in [`TxError::Work`]; if the rollback fails too,
    /// both errors are returned in [`TxError::Rollback`].
    ///
    /// If `ctx` is already done, the run fails with [`TxError::Begin`] and
    /// `work` is never called.
    pub async fn run<T, E, F>(
        &self,
        ctx: &Context,
        options: Option<&TxOptions>,
        work: F,
    ) -> Result<T, TxError<E>>
    where
        F: for<'t> FnOnce(&'t Context, &'t mut D::Tx) -> BoxFuture<'t, Result<T, E>>,
        E: fmt::Display,
    {
        let options = options.unwrap_or(&self.config.default_options);
        let span = info_span!("transaction.run", runner = %self.config.label);

        self.execute(ctx, options, work).instrument(span).await
    }

    async fn execute<T, E, F>(
        &self,
        ctx: &Context,
        options: &TxOptions,
        work: F,
    ) -> Result<T, TxError<E>>
    where
        F: for<'t> FnOnce(&'t Context, &'t mut D::Tx) -> BoxFuture<'t, Result<T, E>>,
        E: fmt::Display,
    {
        let mut tx = match self.db.begin_tx(ctx, options).await {
            Ok(tx) => tx,
            Err(err) => {
                event!(Level::ERROR, error = %err, "failed to begin transaction");
                return Err(TxError::Begin(err));
            }
        };
        event!(
            Level::DEBUG,
            isolation = ?options.isolation,
            read_only = options.read_only,
            "transaction begun"
        );

        match work(ctx, &mut tx).await {
            Ok(value) => match tx.commit(ctx).await {
                Ok(()) => {
                    event!(Level::DEBUG, "transaction committed");
                    Ok(value)
                }
                Err(err) => {
                    event!(Level::ERROR, error = %err, "failed to commit transaction");
                    Err(TxError::Commit(err))
                }
            },
            Err(work_err) => match tx.rollback(ctx).await {
                Ok(()) => {
                    event!(Level::WARN, error = %work_err, "transaction rolled back");
                    Err(TxError::Work(work_err))
                }
                Err(err) => {
                    event!(
                        Level::ERROR,
                        error = %err,
                        work_error = %work_err,
                        "failed to roll back transaction"
                    );
                    Err(TxError::Rollback {
                        work: work_err,
                        rollback: err,
                    })
                }
            },
        }
    }
}

impl<D> fmt::Debug for TxWrapper<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxWrapper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
