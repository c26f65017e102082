use super::{Columns, Rows, StatementBuilder, StatementKind, format_row, format_rows, log_statement, resolve_table};
use crate::error::{FormatError, FormatResult};
use crate::table::IntoTableName;
use crate::value::Value;

impl StatementBuilder {
    /// `insert into <table>(<names>) values(<row>),...`
    ///
    /// The table is the explicit argument, else the table of a passed-in
    /// [`ColumnSet`](crate::ColumnSet). Inserting several rows requires
    /// explicit columns.
    pub fn insert<'a>(
        &self,
        data: &Value,
        columns: impl Into<Columns<'a>>,
        table: impl IntoTableName,
    ) -> FormatResult<String> {
        let columns = columns.into();
        let rows = Rows::of(data)?;
        let cs = match rows {
            Rows::Many(list) if list.is_empty() => {
                return Err(FormatError::type_error(
                    "Cannot generate an INSERT from an empty array.",
                ));
            }
            Rows::Many(_) => columns.for_rows("inserting multiple records")?,
            Rows::One(row) => columns.for_row(row)?,
        };
        if cs.is_empty() {
            return Err(FormatError::NoColumns("an INSERT"));
        }
        let table = resolve_table(table, columns, &cs)?.ok_or(FormatError::UnknownTable)?;

        let options = self.format_options();
        let values = match rows {
            Rows::One(row) => format_row(&cs, row, &options)?,
            Rows::Many(list) => format_rows(&cs, list, "insert ", &options)?,
        };
        let sql = format!(
            "{} {}({}) {}{}",
            self.keyword("insert into", "INSERT INTO"),
            table.name(),
            cs.names(),
            self.keyword("values", "VALUES"),
            values
        );
        log_statement(StatementKind::Insert, &sql);
        Ok(sql)
    }
}
