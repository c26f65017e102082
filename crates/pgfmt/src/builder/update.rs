use super::{Columns, Rows, StatementBuilder, StatementKind, format_rows, log_statement, resolve_table};
use crate::column::AssignOptions;
use crate::error::{FormatError, FormatResult};
use crate::format::as_alias;
use crate::format::template::format_named;
use crate::table::{IntoTableName, TableName};
use crate::value::Value;

/// Options for [`update`](super::update).
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Alias of the target table in a multi-row update.
    pub table_alias: String,
    /// Alias of the `values` list in a multi-row update.
    pub value_alias: String,
    /// Returned instead of an error when there is nothing to update.
    pub empty_update: Option<String>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            table_alias: "t".to_string(),
            value_alias: "v".to_string(),
            empty_update: None,
        }
    }
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = alias.into();
        self
    }

    pub fn value_alias(mut self, alias: impl Into<String>) -> Self {
        self.value_alias = alias.into();
        self
    }

    pub fn empty_update(mut self, sql: impl Into<String>) -> Self {
        self.empty_update = Some(sql.into());
        self
    }

    fn nothing_to_update(&self) -> FormatResult<String> {
        self.empty_update
            .clone()
            .ok_or(FormatError::NoColumns("an UPDATE"))
    }
}

impl StatementBuilder {
    /// Single row: `update <table> set "a"=1,...`.
    ///
    /// Several rows:
    /// `update <table> as t set "a"=v."a",... from (values(...),...) as v("id","a",...)`.
    /// Conditional columns are matched through the values list but never
    /// assigned, so the caller appends e.g. `where v.id = t.id`.
    pub fn update<'a>(
        &self,
        data: &Value,
        columns: impl Into<Columns<'a>>,
        table: impl IntoTableName,
        options: &UpdateOptions,
    ) -> FormatResult<String> {
        let columns = columns.into();
        let format_options = self.format_options();

        let sql = match Rows::of(data)? {
            Rows::Many(list) => {
                if list.is_empty() {
                    return Err(FormatError::type_error(
                        "Cannot generate an UPDATE from an empty array.",
                    ));
                }
                let cs = columns.for_rows("updating multiple records")?;
                let table_alias = as_alias(&Value::from(options.table_alias.as_str()))?;
                let value_alias = as_alias(&Value::from(options.value_alias.as_str()))?;

                let targets: Vec<String> = cs
                    .iter()
                    .filter(|c| !c.is_conditional())
                    .map(|c| format!("{}={value_alias}.{}", c.escaped_name(), c.escaped_name()))
                    .collect();
                if targets.is_empty() {
                    return options.nothing_to_update();
                }
                let table = require_table(resolve_table(table, columns, &cs)?)?;
                let rows = format_rows(&cs, list, "update ", &format_options)?;

                if self.cap_sql {
                    format!(
                        "UPDATE {} AS {table_alias} SET {} FROM (VALUES{rows}) AS {value_alias}({})",
                        table.name(),
                        targets.join(","),
                        cs.names()
                    )
                } else {
                    format!(
                        "update {} as {table_alias} set {} from (values{rows}) as {value_alias}({})",
                        table.name(),
                        targets.join(","),
                        cs.names()
                    )
                }
            }
            Rows::One(row) => {
                let cs = columns.for_row(row)?;
                let assignments = cs.assign(AssignOptions::new().source(row))?;
                if assignments.is_empty() {
                    return options.nothing_to_update();
                }
                let table = require_table(resolve_table(table, columns, &cs)?)?;
                let prepared = cs.prepare(row)?;
                format!(
                    "{} {} {} {}",
                    self.keyword("update", "UPDATE"),
                    table.name(),
                    self.keyword("set", "SET"),
                    format_named(&assignments, &prepared, false, &format_options)?
                )
            }
        };
        log_statement(StatementKind::Update, &sql);
        Ok(sql)
    }
}

fn require_table(table: Option<TableName>) -> FormatResult<TableName> {
    table.ok_or(FormatError::UnknownTable)
}
