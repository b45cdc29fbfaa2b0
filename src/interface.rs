use async_trait::async_trait;
use crate::context::Context;
use crate::core::Result;
use crate::transaction::TxOptions;

/// A handle that can start transactions: a pool, a connection, or a test fake.
///
/// This trait is the seam between [`TxWrapper`](crate::TxWrapper) and a
/// database driver. The `sqlx` SQLite pool implements it out of the box
/// (PostgreSQL with the `postgres` feature); wrap any other driver to use it
/// with the runner.
#[async_trait]
pub trait Database: Send + Sync {
    /// Handle to a transaction started by [`Database::begin_tx`].
    type Tx: Transaction;

    /// Start a transaction honouring `options`.
    ///
    /// Must fail without starting anything when `ctx` is already done.
    async fn begin_tx(&self, ctx: &Context, options: &TxOptions) -> Result<Self::Tx>;
}

/// An open transaction.
///
/// Both finishing operations consume the handle, so a transaction can be
/// finished at most once. Implementations should roll back when a handle is
/// dropped without being finished.
#[async_trait]
pub trait Transaction: Send {
    /// Make the transaction's changes durable.
    async fn commit(self, ctx: &Context) -> Result<()>;

    /// Discard the transaction's changes.
    async fn rollback(self, ctx: &Context) -> Result<()>;
}
