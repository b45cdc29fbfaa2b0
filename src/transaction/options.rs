use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// The level as written in `SET TRANSACTION ISOLATION LEVEL ...`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Options passed through to the driver when a transaction begins.
///
/// The default leaves every choice to the driver.
///
/// # Examples
///
/// ```
/// use txwrapper::{IsolationLevel, TxOptions};
///
/// let options = TxOptions::new()
///     .isolation(IsolationLevel::Serializable)
///     .read_only(true);
///
/// assert!(!options.is_default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxOptions {
    /// Isolation level; `None` means the connection's default
    pub isolation: Option<IsolationLevel>,

    /// Reject writes inside the transaction
    pub read_only: bool,
}

impl TxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the isolation level
    pub fn isolation(mut self, level: IsolationLevel) -> Self {
        self.isolation = Some(level);
        self
    }

    /// Set read-only mode
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_default(&self) -> bool {
        self.isolation.is_none() && !self.read_only
    }

    /// Standard `SET TRANSACTION` statement applying these options, or `None`
    /// when there is nothing to set.
    pub fn set_transaction_statement(&self) -> Option<String> {
        match (self.isolation, self.read_only) {
            (None, false) => None,
            (None, true) => Some("SET TRANSACTION READ ONLY".to_string()),
            (Some(level), false) => Some(format!("SET TRANSACTION ISOLATION LEVEL {}", level)),
            (Some(level), true) => Some(format!(
                "SET TRANSACTION ISOLATION LEVEL {}, READ ONLY",
                level
            )),
        }
    }
}
