use super::SqlxTransaction;
use crate::context::Context;
use crate::core::{DbError, Result};
use crate::interface::{Database, Transaction};
use crate::transaction::{IsolationLevel, TxOptions};
use async_trait::async_trait;
use sqlx::{Pool, Sqlite, SqlitePool};

/// SQLite transactions are always serializable and have no per-transaction
/// read-only switch.
fn check_options(options: &TxOptions) -> Result<()> {
    if options.read_only {
        return Err(DbError::UnsupportedOption(
            "SQLite does not support read-only transactions".to_string(),
        ));
    }

    match options.isolation {
        None | Some(IsolationLevel::Serializable) => Ok(()),
        Some(level) => Err(DbError::UnsupportedOption(format!(
            "SQLite does not support isolation level {}",
            level
        ))),
    }
}

#[async_trait]
impl Database for SqlitePool {
    type Tx = SqlxTransaction<Sqlite>;

    async fn begin_tx(&self, ctx: &Context, options: &TxOptions) -> Result<Self::Tx> {
        ctx.check()?;
        check_options(options)?;

        let tx = ctx.run(Pool::begin(self)).await??;
        Ok(SqlxTransaction::new(tx))
    }
}

#[async_trait]
impl Transaction for SqlxTransaction<Sqlite> {
    async fn commit(self, ctx: &Context) -> Result<()> {
        self.commit_within(ctx).await
    }

    async fn rollback(self, _ctx: &Context) -> Result<()> {
        self.rollback_now().await
    }
}
