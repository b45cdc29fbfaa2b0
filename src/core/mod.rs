pub mod error;

pub use error::{DbError, Result, TxError, TxErrorKind};
