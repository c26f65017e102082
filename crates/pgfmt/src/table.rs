//! Escaped table names.
//!
//! [`TableName`] holds a table and optional schema and renders them as quoted
//! identifiers, escaping `"` as `""`.
//!
//! # Example
//! ```ignore
//! use pgfmt::TableName;
//!
//! let t = TableName::parse("audit.events")?;
//! assert_eq!(t.name(), r#""audit"."events""#);
//! # Ok::<(), pgfmt::FormatError>(())
//! ```

use crate::ctf::ToPostgres;
use crate::error::{FormatError, FormatResult};
use crate::format::quote_name;
use crate::value::Value;
use std::fmt;

/// A fully escaped table name, optionally schema-qualified.
///
/// Implements [`ToPostgres`] as raw text, so it can be passed as a template
/// value and lands in the query unquoted (it is already escaped).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    table: String,
    schema: Option<String>,
    name: String,
}

impl TableName {
    /// Create a table name without schema.
    pub fn new(table: impl Into<String>) -> FormatResult<Self> {
        Self::build(None, table.into())
    }

    /// Create a schema-qualified table name. An empty schema is ignored.
    pub fn with_schema(schema: impl Into<String>, table: impl Into<String>) -> FormatResult<Self> {
        let schema = schema.into();
        Self::build((!schema.is_empty()).then_some(schema), table.into())
    }

    /// Parse `table` or `schema.table`.
    ///
    /// The first `.` with text on both sides separates schema and table;
    /// otherwise the whole string is the table name.
    pub fn parse(path: &str) -> FormatResult<Self> {
        match path.split_once('.') {
            Some((schema, table)) if !schema.is_empty() && !table.is_empty() => {
                Self::with_schema(schema, table)
            }
            _ => Self::new(path),
        }
    }

    fn build(schema: Option<String>, table: String) -> FormatResult<Self> {
        if table.is_empty() {
            return Err(FormatError::type_error(
                "Table name must be a non-empty text string.",
            ));
        }
        let mut name = String::with_capacity(table.len() + 2);
        if let Some(schema) = &schema {
            name.push_str(&quote_name(schema));
            name.push('.');
        }
        name.push_str(&quote_name(&table));
        Ok(Self {
            table,
            schema,
            name,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The escaped SQL name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl ToPostgres for TableName {
    fn to_postgres(&self) -> FormatResult<Value> {
        Ok(Value::Text(self.name.clone()))
    }

    fn raw_type(&self) -> bool {
        true
    }
}

impl From<TableName> for Value {
    fn from(t: TableName) -> Self {
        Value::custom(t)
    }
}

/// Convert an input into an optional [`TableName`].
///
/// This is mainly for ergonomics in the statement builders, where the table
/// argument may be omitted (`None`) to fall back to the column set's table.
pub trait IntoTableName {
    fn into_table_name(self) -> FormatResult<Option<TableName>>;
}

impl IntoTableName for TableName {
    fn into_table_name(self) -> FormatResult<Option<TableName>> {
        Ok(Some(self))
    }
}

impl IntoTableName for &TableName {
    fn into_table_name(self) -> FormatResult<Option<TableName>> {
        Ok(Some(self.clone()))
    }
}

impl IntoTableName for &str {
    fn into_table_name(self) -> FormatResult<Option<TableName>> {
        TableName::new(self).map(Some)
    }
}

impl IntoTableName for String {
    fn into_table_name(self) -> FormatResult<Option<TableName>> {
        TableName::new(self).map(Some)
    }
}

impl<T: IntoTableName> IntoTableName for Option<T> {
    fn into_table_name(self) -> FormatResult<Option<TableName>> {
        match self {
            Some(t) => t.into_table_name(),
            None => Ok(None),
        }
    }
}
