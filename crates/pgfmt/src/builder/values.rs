use super::{Columns, Rows, StatementBuilder, StatementKind, format_row, format_rows, log_statement};
use crate::error::{FormatError, FormatResult};
use crate::format::template::format_named;
use crate::column::AssignOptions;
use crate::value::Value;

impl StatementBuilder {
    /// `(v1,v2,...)` per row, comma-joined. An empty list of rows gives an
    /// empty string.
    pub fn values<'a>(&self, data: &Value, columns: impl Into<Columns<'a>>) -> FormatResult<String> {
        let columns = columns.into();
        let rows = Rows::of(data)?;
        let cs = match rows {
            Rows::Many(_) => columns.for_rows("generating multi-row values")?,
            Rows::One(row) => columns.for_row(row)?,
        };
        if cs.is_empty() {
            return Err(FormatError::NoColumns("values"));
        }

        let options = self.format_options();
        let sql = match rows {
            Rows::One(row) => format_row(&cs, row, &options)?,
            Rows::Many(list) => format_rows(&cs, list, "", &options)?,
        };
        log_statement(StatementKind::Values, &sql);
        Ok(sql)
    }

    /// The formatted assignment list of one row: `"a"=1,"b"='x'`.
    ///
    /// Columns with a `skip` predicate are evaluated against the row.
    pub fn sets<'a>(&self, data: &Value, columns: impl Into<Columns<'a>>) -> FormatResult<String> {
        let Value::Object(row) = data else {
            return Err(FormatError::type_error("Invalid parameter 'data' specified."));
        };
        let cs = columns.into().for_row(row)?;
        let template = cs.assign(AssignOptions::new().source(row))?;
        let prepared = cs.prepare(row)?;
        let sql = format_named(&template, &prepared, false, &self.format_options())?;
        log_statement(StatementKind::Sets, &sql);
        Ok(sql)
    }
}
