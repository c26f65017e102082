//! # pgfmt
//!
//! Safe SQL value formatting and query templating for Postgres.
//!
//! ## Features
//!
//! - **Exact escaping**: text quotes are doubled, identifiers double-quoted,
//!   nothing else is ever substituted
//! - **Three addressing modes**: positional `$1`, named `${name}` (five
//!   delimiter pairs, nested paths) and single-value templates
//! - **Modifiers**: `^`/`:raw`, `~`/`:name`, `:alias`, `:json`, `:csv`/`:list`,
//!   `#`/`:value`
//! - **Custom types**: implement [`ToPostgres`] to render domain types,
//!   optionally as raw SQL
//! - **Statement generation**: [`ColumnSet`] plus [`insert`], [`update`],
//!   [`values`], [`sets`] and [`concat`] for multi-row statements
//!
//! ## Formatting
//!
//! ```ignore
//! use pgfmt::{format, Object, Value};
//!
//! let sql = format("select * from $1~ where id = $2", &Value::from(["users".into(), Value::from(5)]))?;
//! assert_eq!(sql, r#"select * from "users" where id = 5"#);
//!
//! let params = Value::from(Object::new().with("name", "O'Hara").with("tags", vec!["a", "b"]));
//! let sql = format("select ${name}, ${tags:json}", &params)?;
//! assert_eq!(sql, r#"select 'O''Hara', '["a","b"]'"#);
//! ```
//!
//! ## Multi-row statements
//!
//! ```ignore
//! use pgfmt::{ColumnSet, ColumnSetOptions, TableName, UpdateOptions, Value, update};
//!
//! let cs = ColumnSet::with_options(
//!     ["?id", "val"],
//!     ColumnSetOptions::new().table(TableName::new("items")?),
//! )?;
//! let sql = update(&rows, &cs, None::<&str>, &UpdateOptions::default())? + " where v.id = t.id";
//! ```

pub mod builder;
pub mod column;
pub mod ctf;
pub mod error;
pub mod format;
pub mod prelude;
pub mod table;
pub mod value;

pub use builder::{
    Columns, QueryPart, StatementBuilder, UpdateOptions, concat, insert, sets, update, values,
};
pub use column::{
    AssignColumnsOptions, AssignOptions, Column, ColumnConfig, ColumnDescriptor, ColumnInput,
    ColumnSet, ColumnSetOptions, InitFn, SkipColumns, SkipFn,
};
pub use ctf::{Raw, ToPostgres};
pub use error::{FormatError, FormatResult};
pub use format::{
    Fallback, FormatOptions, MAX_VARIABLE, Missing, Modifier, as_alias, as_array, as_bool,
    as_bytes, as_csv, as_date, as_json, as_name, as_number, as_open_value, as_text, format,
    format_value, format_with, quote_name,
};
pub use table::{IntoTableName, TableName};
pub use value::{LazyValue, Object, Value};
