//! Statement builders.
//!
//! Generate complete SQL fragments from plain data rows and a [`ColumnSet`]:
//!
//! - [`insert`]: `insert into "t"("a","b") values(1,'x'),(2,'y')`
//! - [`update`]: single-row `update "t" set ...` or the multi-row
//!   `update ... from (values ...)` form
//! - [`values`]: just the `(1,'x'),(2,'y')` list
//! - [`sets`]: just the `"a"=1,"b"='x'` assignment list
//! - [`concat`]: join several queries with `;`
//!
//! The free functions render lower-case keywords. [`StatementBuilder`] with
//! `cap_sql(true)` renders them upper-case; escaping is unaffected.

pub mod concat;
pub mod insert;
pub mod update;
pub mod values;

pub use concat::QueryPart;
pub use update::UpdateOptions;

use crate::column::{ColumnSet, ColumnSetOptions};
use crate::error::{FormatError, FormatResult};
use crate::format::FormatOptions;
use crate::format::template::format_named;
use crate::table::{IntoTableName, TableName};
use crate::value::{Object, Value};
use std::borrow::Cow;

/// Builder-wide settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder {
    /// Render keywords upper-case (`INSERT INTO`, `ARRAY[...]`).
    pub cap_sql: bool,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cap_sql(mut self, cap_sql: bool) -> Self {
        self.cap_sql = cap_sql;
        self
    }

    pub(crate) fn format_options(&self) -> FormatOptions {
        FormatOptions::new().cap_sql(self.cap_sql)
    }

    pub(crate) fn keyword<'k>(&self, lower: &'k str, upper: &'k str) -> &'k str {
        if self.cap_sql { upper } else { lower }
    }
}

/// Where a builder takes its columns from.
#[derive(Debug, Clone, Copy, Default)]
pub enum Columns<'a> {
    /// Infer from the property names of a single row.
    #[default]
    Infer,
    /// A prepared column set (may also supply the table).
    Set(&'a ColumnSet),
    /// Column shorthands, e.g. `["?id", "name", "data:json"]`.
    Names(&'a [&'a str]),
}

impl<'a> From<&'a ColumnSet> for Columns<'a> {
    fn from(cs: &'a ColumnSet) -> Self {
        Columns::Set(cs)
    }
}

impl<'a> From<Option<&'a ColumnSet>> for Columns<'a> {
    fn from(cs: Option<&'a ColumnSet>) -> Self {
        cs.map_or(Columns::Infer, Columns::Set)
    }
}

impl<'a> From<&'a [&'a str]> for Columns<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Columns::Names(names)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Columns<'a> {
    fn from(names: &'a [&'a str; N]) -> Self {
        Columns::Names(names)
    }
}

/// Shape of the `data` argument.
pub(crate) enum Rows<'a> {
    One(&'a Object),
    Many(&'a [Value]),
}

impl<'a> Rows<'a> {
    pub(crate) fn of(data: &'a Value) -> FormatResult<Self> {
        match data {
            Value::Object(row) => Ok(Rows::One(row)),
            Value::Array(rows) => Ok(Rows::Many(rows)),
            _ => Err(FormatError::type_error("Invalid parameter 'data' specified.")),
        }
    }
}

impl<'a> Columns<'a> {
    /// Resolve for a single row, inferring from it when needed.
    pub(crate) fn for_row(self, row: &Object) -> FormatResult<Cow<'a, ColumnSet>> {
        match self {
            Columns::Set(cs) => Ok(Cow::Borrowed(cs)),
            Columns::Names(names) => ColumnSet::new(names.iter().copied()).map(Cow::Owned),
            Columns::Infer => ColumnSet::from_object(row, ColumnSetOptions::default()).map(Cow::Owned),
        }
    }

    /// Resolve for a list of rows, where nothing can be inferred.
    pub(crate) fn for_rows(self, required: &'static str) -> FormatResult<Cow<'a, ColumnSet>> {
        match self {
            Columns::Set(cs) => Ok(Cow::Borrowed(cs)),
            Columns::Names(names) => ColumnSet::new(names.iter().copied()).map(Cow::Owned),
            Columns::Infer => Err(FormatError::type_error(format!(
                "Parameter 'columns' is required when {required}."
            ))),
        }
    }

    pub(crate) fn is_set(&self) -> bool {
        matches!(self, Columns::Set(_))
    }
}

/// Explicit table first, then the table of a passed-in column set.
pub(crate) fn resolve_table(
    table: impl IntoTableName,
    columns: Columns<'_>,
    cs: &ColumnSet,
) -> FormatResult<Option<TableName>> {
    let table = table.into_table_name()?;
    if table.is_some() || !columns.is_set() {
        return Ok(table);
    }
    Ok(cs.table().cloned())
}

/// `(v1,v2,...)` for one row.
pub(crate) fn format_row(cs: &ColumnSet, row: &Object, options: &FormatOptions) -> FormatResult<String> {
    let prepared = cs.prepare(row)?;
    let values = format_named(cs.variables(), &prepared, false, options)?;
    Ok(format!("({values})"))
}

/// Comma-joined rows; non-object rows fail with their index.
pub(crate) fn format_rows(
    cs: &ColumnSet,
    rows: &[Value],
    kind: &'static str,
    options: &FormatOptions,
) -> FormatResult<String> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(row) => format_row(cs, row, options),
            _ => Err(FormatError::InvalidRow { kind, index }),
        })
        .collect::<FormatResult<Vec<_>>>()
        .map(|rows| rows.join(","))
}

/// Kind of generated statement, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Insert,
    Update,
    Values,
    Sets,
    Concat,
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub(crate) fn log_statement(kind: StatementKind, sql: &str) {
    if sql.len() > MAX_LOGGED_SQL {
        tracing::debug!(
            target: "pgfmt.sql",
            statement = ?kind,
            len = sql.len(),
            sql = %format_args!("{}...", truncate_sql_bytes(sql, MAX_LOGGED_SQL)),
        );
    } else {
        tracing::debug!(target: "pgfmt.sql", statement = ?kind, len = sql.len(), sql = %sql);
    }
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn log_statement(_kind: StatementKind, _sql: &str) {}

/// Generate an `INSERT` with lower-case keywords.
///
/// ```ignore
/// use pgfmt::{insert, Object, Value};
///
/// let row = Value::from(Object::new().with("a", 1).with("b", "x"));
/// let sql = insert(&row, &["a", "b"], "a_table")?;
/// assert_eq!(sql, r#"insert into "a_table"("a","b") values(1,'x')"#);
/// ```
pub fn insert<'a>(
    data: &Value,
    columns: impl Into<Columns<'a>>,
    table: impl IntoTableName,
) -> FormatResult<String> {
    StatementBuilder::default().insert(data, columns, table)
}

/// Generate an `UPDATE` with lower-case keywords.
pub fn update<'a>(
    data: &Value,
    columns: impl Into<Columns<'a>>,
    table: impl IntoTableName,
    options: &UpdateOptions,
) -> FormatResult<String> {
    StatementBuilder::default().update(data, columns, table, options)
}

/// Generate a `VALUES` row list.
pub fn values<'a>(data: &Value, columns: impl Into<Columns<'a>>) -> FormatResult<String> {
    StatementBuilder::default().values(data, columns)
}

/// Generate a `SET` assignment list for one row.
pub fn sets<'a>(data: &Value, columns: impl Into<Columns<'a>>) -> FormatResult<String> {
    StatementBuilder::default().sets(data, columns)
}

/// Format and join several queries with `;`.
pub fn concat<'a, I, Q>(parts: I) -> FormatResult<String>
where
    I: IntoIterator<Item = Q>,
    Q: Into<QueryPart<'a>>,
{
    StatementBuilder::default().concat(parts)
}

#[cfg(test)]
mod tests;
