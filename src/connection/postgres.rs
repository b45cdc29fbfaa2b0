use super::SqlxTransaction;
use crate::context::Context;
use crate::core::Result;
use crate::interface::{Database, Transaction};
use crate::transaction::TxOptions;
use async_trait::async_trait;
use sqlx::{PgPool, Pool, Postgres};
use tracing::{Level, event};

#[async_trait]
impl Database for PgPool {
    type Tx = SqlxTransaction<Postgres>;

    async fn begin_tx(&self, ctx: &Context, options: &TxOptions) -> Result<Self::Tx> {
        ctx.check()?;

        let mut tx = ctx.run(Pool::begin(self)).await??;

        // Must be the first statement of the transaction; a failure drops
        // `tx`, which rolls it back.
        if let Some(statement) = options.set_transaction_statement() {
            ctx.run(sqlx::query(&statement).execute(&mut *tx)).await??;
            event!(Level::DEBUG, statement = %statement, "transaction options applied");
        }

        Ok(SqlxTransaction::new(tx))
    }
}

#[async_trait]
impl Transaction for SqlxTransaction<Postgres> {
    async fn commit(self, ctx: &Context) -> Result<()> {
        self.commit_within(ctx).await
    }

    async fn rollback(self, _ctx: &Context) -> Result<()> {
        self.rollback_now().await
    }
}
