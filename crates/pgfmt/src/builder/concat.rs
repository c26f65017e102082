use super::{StatementBuilder, StatementKind, log_statement};
use crate::error::FormatResult;
use crate::format::FormatOptions;
use crate::format::template::format_query;
use crate::value::Value;
use std::borrow::Cow;

/// One entry of [`concat`](super::concat).
#[derive(Debug, Clone)]
pub enum QueryPart<'a> {
    /// Ready SQL, used as is.
    Sql(Cow<'a, str>),
    /// A template formatted with its values first.
    Template {
        query: Cow<'a, str>,
        values: Option<&'a Value>,
        /// Own formatting options; `None` uses the builder's. Options that
        /// leave `cap_sql` unset inherit it from the builder.
        options: Option<FormatOptions>,
    },
}

impl<'a> QueryPart<'a> {
    pub fn template(query: impl Into<Cow<'a, str>>, values: impl Into<Option<&'a Value>>) -> Self {
        QueryPart::Template {
            query: query.into(),
            values: values.into(),
            options: None,
        }
    }

    /// Set the formatting options of a template part. Plain SQL parts become
    /// templates without values.
    pub fn with_options(self, options: FormatOptions) -> Self {
        match self {
            QueryPart::Sql(query) => QueryPart::Template {
                query,
                values: None,
                options: Some(options),
            },
            QueryPart::Template { query, values, .. } => QueryPart::Template {
                query,
                values,
                options: Some(options),
            },
        }
    }
}

impl<'a> From<&'a str> for QueryPart<'a> {
    fn from(sql: &'a str) -> Self {
        QueryPart::Sql(Cow::Borrowed(sql))
    }
}

impl From<String> for QueryPart<'_> {
    fn from(sql: String) -> Self {
        QueryPart::Sql(Cow::Owned(sql))
    }
}

/// Strip leading and trailing whitespace and `;`.
fn clean(sql: &str) -> &str {
    sql.trim_matches(|c: char| c == ';' || c.is_whitespace())
}

impl StatementBuilder {
    /// Format every part, strip surrounding whitespace and semicolons, drop
    /// the empty ones and join the rest with `;`.
    pub fn concat<'a, I, Q>(&self, parts: I) -> FormatResult<String>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QueryPart<'a>>,
    {
        let mut queries = Vec::new();
        for part in parts {
            let formatted = match part.into() {
                QueryPart::Sql(sql) => sql,
                QueryPart::Template {
                    query,
                    values,
                    options,
                } => {
                    let mut options = options.unwrap_or_default();
                    options.cap_sql.get_or_insert(self.cap_sql);
                    Cow::Owned(format_query(&query, values, false, &options)?)
                }
            };
            let cleaned = clean(&formatted);
            if !cleaned.is_empty() {
                queries.push(cleaned.to_string());
            }
        }
        let sql = queries.join(";");
        log_statement(StatementKind::Concat, &sql);
        Ok(sql)
    }
}
