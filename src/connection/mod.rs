// ============================================================================
// sqlx Driver Adapters
// ============================================================================
//
// Implements the `Database`/`Transaction` seam for sqlx pools:
// - SQLite (always available)
// - PostgreSQL (feature `postgres`)
//
// ============================================================================

mod sqlite;

#[cfg(feature = "postgres")]
mod postgres;

use crate::context::Context;
use crate::core::Result;
use std::ops::{Deref, DerefMut};
use tracing::{Level, event};

/// Transaction handle handed to work functions by the sqlx adapters.
///
/// Dereferences to the driver connection, so queries run inside the
/// transaction with `.execute(tx.as_executor())` or `.execute(&mut **tx)`.
///
/// Dropping the handle without finishing it rolls the transaction back.
pub struct SqlxTransaction<DB: sqlx::Database> {
    inner: sqlx::Transaction<'static, DB>,
}

impl<DB: sqlx::Database> SqlxTransaction<DB> {
    pub(crate) fn new(inner: sqlx::Transaction<'static, DB>) -> Self {
        Self { inner }
    }

    /// The connection the transaction runs on
    pub fn as_executor(&mut self) -> &mut DB::Connection {
        &mut *self.inner
    }

    /// Commit unless `ctx` is already done, in which case roll back and
    /// report the context error instead.
    async fn commit_within(self, ctx: &Context) -> Result<()> {
        if let Err(err) = ctx.check() {
            if let Err(rollback_err) = self.inner.rollback().await {
                event!(
                    Level::WARN,
                    error = %rollback_err,
                    "rollback of abandoned transaction failed"
                );
            }
            return Err(err.into());
        }

        self.inner.commit().await?;
        Ok(())
    }

    /// Roll back regardless of the context, so a cancelled run still releases
    /// its transaction.
    async fn rollback_now(self) -> Result<()> {
        self.inner.rollback().await?;
        Ok(())
    }
}

impl<DB: sqlx::Database> Deref for SqlxTransaction<DB> {
    type Target = DB::Connection;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl<DB: sqlx::Database> DerefMut for SqlxTransaction<DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.inner
    }
}
