use crate::context::ContextError;
use std::fmt;
use thiserror::Error;

/// Failure reported by a database collaborator (driver, context, options).
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Driver(#[from] sqlx::Error),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Unsupported transaction option: {0}")]
    UnsupportedOption(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Which step of a transaction run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxErrorKind {
    Begin,
    Work,
    Rollback,
    Commit,
}

impl fmt::Display for TxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxErrorKind::Begin => "begin",
            TxErrorKind::Work => "work",
            TxErrorKind::Rollback => "rollback",
            TxErrorKind::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Error returned by [`TxWrapper::run`](crate::TxWrapper::run).
///
/// `E` is the error type of the caller's work function. It is returned
/// untouched in [`TxError::Work`], and kept alongside the rollback failure in
/// [`TxError::Rollback`] so neither cause is lost.
#[derive(Error, Debug)]
pub enum TxError<E> {
    /// The transaction could not be started. The work function never ran.
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] DbError),

    /// The work function failed and the transaction was rolled back.
    #[error(transparent)]
    Work(E),

    /// The work function failed and rolling back failed as well.
    #[error("failed to roll back transaction after work error ({work}): {rollback}")]
    Rollback {
        work: E,
        #[source]
        rollback: DbError,
    },

    /// The work function succeeded but the commit did not.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] DbError),
}

impl<E> TxError<E> {
    pub fn kind(&self) -> TxErrorKind {
        match self {
            TxError::Begin(_) => TxErrorKind::Begin,
            TxError::Work(_) => TxErrorKind::Work,
            TxError::Rollback { .. } => TxErrorKind::Rollback,
            TxError::Commit(_) => TxErrorKind::Commit,
        }
    }

    /// The work function's error, if the run failed because of it.
    pub fn work_error(&self) -> Option<&E> {
        match self {
            TxError::Work(err) | TxError::Rollback { work: err, .. } => Some(err),
            _ => None,
        }
    }

    pub fn into_work_error(self) -> Option<E> {
        match self {
            TxError::Work(err) | TxError::Rollback { work: err, .. } => Some(err),
            _ => None,
        }
    }

    /// The error raised by the database while beginning, committing or
    /// rolling back.
    pub fn db_error(&self) -> Option<&DbError> {
        match self {
            TxError::Begin(err) | TxError::Commit(err) => Some(err),
            TxError::Rollback { rollback, .. } => Some(rollback),
            TxError::Work(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Error, Debug, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_work_error_is_transparent() {
        let err: TxError<Boom> = TxError::Work(Boom);
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.kind(), TxErrorKind::Work);
        assert!(err.db_error().is_none());
        assert_eq!(err.into_work_error(), Some(Boom));
    }

    #[test]
    fn test_rollback_error_keeps_both_causes() {
        let err: TxError<Boom> = TxError::Rollback {
            work: Boom,
            rollback: DbError::ExecutionError("connection reset".into()),
        };

        let message = err.to_string();
        assert!(message.contains("boom"));
        assert!(message.contains("connection reset"));
        assert_eq!(err.work_error(), Some(&Boom));

        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Execution error: connection reset");
    }

    #[test]
    fn test_begin_and_commit_expose_db_error() {
        let begin: TxError<Boom> = TxError::Begin(ContextError::Cancelled.into());
        assert_eq!(begin.kind(), TxErrorKind::Begin);
        assert!(matches!(
            begin.db_error(),
            Some(DbError::Context(ContextError::Cancelled))
        ));
        assert!(begin.work_error().is_none());

        let commit: TxError<Boom> = TxError::Commit(DbError::ExecutionError("disk full".into()));
        assert_eq!(commit.kind(), TxErrorKind::Commit);
        assert_eq!(commit.to_string(), "failed to commit transaction: Execution error: disk full");
    }
}
