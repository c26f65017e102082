use super::{Column, ColumnInput};
use crate::error::{FormatError, FormatResult};
use crate::format::as_alias;
use crate::table::TableName;
use crate::value::{Object, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Options for [`ColumnSet::with_options`] and [`ColumnSet::from_object`].
#[derive(Debug, Clone, Default)]
pub struct ColumnSetOptions {
    /// Default table for statements built from the set.
    pub table: Option<TableName>,
    /// Include inherited properties when inferring columns from an object.
    pub inherit: bool,
}

impl ColumnSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableName) -> Self {
        self.table = Some(table);
        self
    }

    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

/// Options for [`ColumnSet::assign`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignOptions<'a> {
    /// Row handed to `skip` predicates. Without it no column is skipped.
    pub source: Option<&'a Object>,
    /// Alias prefixed to every column, e.g. `t` for `t."col"=...`.
    pub prefix: Option<&'a str>,
}

impl<'a> AssignOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: &'a Object) -> Self {
        self.source = Some(source);
        self
    }

    pub fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

/// Columns excluded by [`ColumnSet::assign_columns`].
#[derive(Clone, Copy, Default)]
pub enum SkipColumns<'a> {
    #[default]
    None,
    /// Skip columns with any of these names.
    Names(&'a [&'a str]),
    /// Skip columns the predicate accepts.
    Predicate(&'a dyn Fn(&Column) -> bool),
}

impl SkipColumns<'_> {
    fn skips(&self, column: &Column) -> bool {
        match self {
            SkipColumns::None => false,
            SkipColumns::Names(names) => names.contains(&column.name()),
            SkipColumns::Predicate(f) => f(column),
        }
    }
}

impl std::fmt::Debug for SkipColumns<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipColumns::None => f.write_str("None"),
            SkipColumns::Names(names) => f.debug_tuple("Names").field(names).finish(),
            SkipColumns::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Options for [`ColumnSet::assign_columns`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignColumnsOptions<'a> {
    /// Alias of the source side (right of `=`).
    pub from: Option<&'a str>,
    /// Alias of the target side (left of `=`).
    pub to: Option<&'a str>,
    pub skip: SkipColumns<'a>,
}

impl<'a> AssignColumnsOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_alias(mut self, alias: &'a str) -> Self {
        self.from = Some(alias);
        self
    }

    pub fn to_alias(mut self, alias: &'a str) -> Self {
        self.to = Some(alias);
        self
    }

    pub fn skip(mut self, skip: SkipColumns<'a>) -> Self {
        self.skip = skip;
        self
    }
}

/// An ordered collection of uniquely named columns.
///
/// Column sets are immutable: [`extend`](Self::extend) and
/// [`merge`](Self::merge) return new sets. The joined names, variables and
/// the plain assignment list are computed once and cached.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<Arc<Column>>,
    table: Option<TableName>,
    is_simple: bool,
    names: OnceLock<String>,
    variables: OnceLock<String>,
    updates: OnceLock<String>,
}

impl ColumnSet {
    /// Build a set from column names, configs or columns.
    pub fn new<I, C>(columns: I) -> FormatResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        Self::with_options(columns, ColumnSetOptions::default())
    }

    pub fn with_options<I, C>(columns: I, options: ColumnSetOptions) -> FormatResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for input in columns {
            let column = input.into().into_column()?;
            if !seen.insert(column.name().to_string()) {
                return Err(FormatError::DuplicateColumn(column.name().to_string()));
            }
            list.push(column);
        }
        Ok(Self::from_parts(list, options.table))
    }

    /// Infer the columns from the property names of `source`.
    ///
    /// Each key is parsed with the shorthand syntax of [`Column::new`].
    pub fn from_object(source: &Object, options: ColumnSetOptions) -> FormatResult<Self> {
        let keys = if options.inherit {
            source.all_keys()
        } else {
            source.keys().collect()
        };
        Self::with_options(keys, options)
    }

    fn from_parts(columns: Vec<Arc<Column>>, table: Option<TableName>) -> Self {
        let is_simple = !columns
            .iter()
            .any(|c| c.prop().is_some() || c.has_init() || c.has_default());
        Self {
            columns,
            table,
            is_simple,
            names: OnceLock::new(),
            variables: OnceLock::new(),
            updates: OnceLock::new(),
        }
    }

    pub fn table(&self) -> Option<&TableName> {
        self.table.as_ref()
    }

    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Column>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// No column renames its source, has a default or an override, so rows
    /// can be formatted without preparation.
    pub fn is_simple(&self) -> bool {
        self.is_simple
    }

    /// Comma-separated escaped column names: `"id","name"`.
    pub fn names(&self) -> &str {
        self.names.get_or_init(|| {
            self.columns
                .iter()
                .map(|c| c.escaped_name())
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// Comma-separated variables with casts: `${id},${data:json}::jsonb`.
    pub fn variables(&self) -> &str {
        self.variables.get_or_init(|| {
            self.columns
                .iter()
                .map(|c| format!("{}{}", c.variable(), c.cast_text()))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// The `SET` list template: `"a"=${a},"b"=${b}::int`.
    ///
    /// Conditional columns are never assigned. A column's `skip` predicate only
    /// runs when a source row is given. Without a prefix and without skip
    /// predicates the result is cached.
    pub fn assign(&self, options: AssignOptions<'_>) -> FormatResult<Cow<'_, str>> {
        let prefix = options.prefix.filter(|p| !p.is_empty());
        let cacheable = prefix.is_none() && !self.columns.iter().any(|c| c.has_skip());
        if cacheable {
            if let Some(cached) = self.updates.get() {
                return Ok(Cow::Borrowed(cached.as_str()));
            }
        }

        let prefix = match prefix {
            Some(p) => format!("{}.", as_alias(&Value::from(p))?),
            None => String::new(),
        };
        let assignments = self
            .columns
            .iter()
            .filter(|c| !c.is_conditional() && !c.should_skip(options.source))
            .map(|c| {
                format!(
                    "{prefix}{}={}{}",
                    c.escaped_name(),
                    c.variable(),
                    c.cast_text()
                )
            })
            .collect::<Vec<_>>()
            .join(",");

        if cacheable {
            return Ok(Cow::Borrowed(self.updates.get_or_init(|| assignments).as_str()));
        }
        Ok(Cow::Owned(assignments))
    }

    /// Column-to-column assignments: `"t"."a"="s"."a",...`.
    pub fn assign_columns(&self, options: AssignColumnsOptions<'_>) -> FormatResult<String> {
        let alias = |a: Option<&str>| -> FormatResult<String> {
            match a.filter(|a| !a.is_empty()) {
                Some(a) => Ok(format!("{}.", as_alias(&Value::from(a))?)),
                None => Ok(String::new()),
            }
        };
        let from = alias(options.from)?;
        let to = alias(options.to)?;
        Ok(self
            .columns
            .iter()
            .filter(|c| !options.skip.skips(c))
            .map(|c| {
                let name = c.escaped_name();
                format!("{to}{name}={from}{name}")
            })
            .collect::<Vec<_>>()
            .join(","))
    }

    /// Map a source row to the object the templates of this set read.
    ///
    /// Simple sets return the source unchanged. Otherwise each column reads
    /// its source property (own or inherited), falling back to its default,
    /// and `init` overrides the result. Properties that are missing and have
    /// no default are left out.
    pub fn prepare<'a>(&self, source: &'a Object) -> FormatResult<Cow<'a, Object>> {
        if self.is_simple {
            return Ok(Cow::Borrowed(source));
        }
        let mut target = Object::new();
        for column in &self.columns {
            let descriptor = column.describe(source);
            if let Some(value) = column.init_value(&descriptor) {
                target.insert(descriptor.name, value?);
            } else if descriptor.exists || column.has_default() {
                let name = descriptor.name;
                if let Some(value) = descriptor.value {
                    target.insert(name, value);
                }
            }
        }
        Ok(Cow::Owned(target))
    }

    /// A new set with `columns` appended. Name collisions are an error.
    pub fn extend<I, C>(&self, columns: I) -> FormatResult<ColumnSet>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let other = ColumnSet::new(columns)?;
        let mut list = self.columns.clone();
        for column in other.columns {
            if list.iter().any(|c| c.name() == column.name()) {
                return Err(FormatError::DuplicateColumn(column.name().to_string()));
            }
            list.push(column);
        }
        Ok(Self::from_parts(list, self.table.clone()))
    }

    /// A new set where same-named columns are replaced in place and new ones
    /// appended.
    pub fn merge<I, C>(&self, columns: I) -> FormatResult<ColumnSet>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let other = ColumnSet::new(columns)?;
        let mut list = self.columns.clone();
        for column in other.columns {
            match list.iter().position(|c| c.name() == column.name()) {
                Some(i) => list[i] = column,
                None => list.push(column),
            }
        }
        Ok(Self::from_parts(list, self.table.clone()))
    }
}

impl From<Column> for ColumnSet {
    fn from(column: Column) -> Self {
        Self::from_parts(vec![Arc::new(column)], None)
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Arc<Column>;
    type IntoIter = std::slice::Iter<'a, Arc<Column>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
