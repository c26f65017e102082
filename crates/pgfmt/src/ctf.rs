//! Custom type formatting.
//!
//! Any type can take over its own SQL rendition by implementing [`ToPostgres`]
//! and being wrapped in [`Value::Custom`]. The formatter calls
//! [`ToPostgres::to_postgres`], treats the result as a fresh value and, when
//! [`ToPostgres::raw_type`] is `true`, injects it without quoting or escaping.
//!
//! ```ignore
//! use pgfmt::{ToPostgres, Value, FormatResult, format};
//!
//! #[derive(Debug)]
//! struct Now;
//!
//! impl ToPostgres for Now {
//!     fn to_postgres(&self) -> FormatResult<Value> {
//!         Ok("now()".into())
//!     }
//!     fn raw_type(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let sql = format("insert into log(at) values($1)", &Value::from([Value::custom(Now)]))?;
//! assert_eq!(sql, "insert into log(at) values(now())");
//! ```

use crate::error::FormatResult;
use crate::value::Value;
use std::fmt;

/// Capability of supplying pre-formatted SQL.
///
/// `to_postgres` must be synchronous and side-effect free; it may return any
/// [`Value`], including another custom value, which is resolved in turn.
pub trait ToPostgres: fmt::Debug + Send + Sync {
    /// Produce the value to format in place of `self`.
    fn to_postgres(&self) -> FormatResult<Value>;

    /// When `true`, the produced text is injected verbatim.
    fn raw_type(&self) -> bool {
        false
    }
}

/// Verbatim SQL text.
///
/// Nothing is escaped: only use it for text that never comes from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw(pub String);

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Raw(sql.into())
    }
}

impl ToPostgres for Raw {
    fn to_postgres(&self) -> FormatResult<Value> {
        Ok(Value::Text(self.0.clone()))
    }

    fn raw_type(&self) -> bool {
        true
    }
}

impl From<Raw> for Value {
    fn from(raw: Raw) -> Self {
        Value::custom(raw)
    }
}
