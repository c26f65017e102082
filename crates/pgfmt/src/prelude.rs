//! Convenient imports for typical `pgfmt` usage.
//!
//! ```ignore
//! use pgfmt::prelude::*;
//! ```

pub use crate::{
    Column, ColumnConfig, ColumnSet, ColumnSetOptions, Columns, FormatError, FormatOptions,
    FormatResult, Object, Raw, StatementBuilder, TableName, ToPostgres, UpdateOptions, Value,
    format, format_with, insert, sets, update, values,
};
