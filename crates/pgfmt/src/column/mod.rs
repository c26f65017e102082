//! Column descriptors for generated `INSERT` / `UPDATE` statements.
//!
//! A [`Column`] describes one target column: its SQL name, the source property
//! it reads from, the modifier and cast applied to its value, and optional
//! default/override/skip rules. A [`ColumnSet`] is an ordered, immutable
//! collection of columns with cached template fragments.
//!
//! # Example
//!
//! ```ignore
//! use pgfmt::{Column, ColumnConfig, ColumnSet};
//!
//! let cs = ColumnSet::new([
//!     Column::new("?id")?,
//!     Column::new("name")?,
//!     Column::from_config(ColumnConfig::new("data").modifier(":json").cast("jsonb"))?,
//! ])?;
//! assert_eq!(cs.names(), r#""id","name","data""#);
//! assert_eq!(cs.variables(), "${id},${name},${data:json}::jsonb");
//! ```

mod set;

pub use set::{AssignColumnsOptions, AssignOptions, ColumnSet, ColumnSetOptions, SkipColumns};

use crate::error::{FormatError, FormatResult};
use crate::format::modifier::{MODIFIER_TOKENS, Modifier};
use crate::format::quote_name;
use crate::value::{Object, Value};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Override function: computes the value stored for a column by `prepare`.
pub type InitFn = Arc<dyn Fn(&ColumnDescriptor<'_>) -> FormatResult<Value> + Send + Sync>;

/// Skip predicate: `true` excludes the column from an assignment list.
pub type SkipFn = Arc<dyn Fn(&ColumnDescriptor<'_>) -> bool + Send + Sync>;

fn column_re() -> &'static Regex {
    static COLUMN_RE: OnceLock<Regex> = OnceLock::new();
    COLUMN_RE.get_or_init(|| {
        Regex::new(r"^\??[a-zA-Z0-9$_]+(\^|~|#|:raw|:alias|:name|:json|:csv|:list|:value)?$")
            .expect("invalid built-in column regex")
    })
}

/// `[a-zA-Z0-9$_]+`: the names usable inside a `${...}` variable.
fn is_valid_variable(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'$' || b == b'_')
}

fn modifier_token(s: &str) -> Option<&'static str> {
    MODIFIER_TOKENS.iter().copied().find(|t| *t == s)
}

fn parse_cast(cast: &str) -> FormatResult<String> {
    let trimmed = cast
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_end();
    if trimmed.is_empty() {
        return Err(FormatError::syntax(format!("Invalid 'cast' value: {cast:?}.")));
    }
    Ok(trimmed.to_string())
}

/// Plain description of a column, validated by [`Column::from_config`].
#[derive(Clone, Default)]
pub struct ColumnConfig {
    /// SQL column name.
    pub name: String,
    /// Source property, when it differs from `name`.
    pub prop: Option<String>,
    /// Modifier token (`^`, `~`, `:json`, ...).
    pub modifier: Option<String>,
    /// SQL type cast appended to the variable.
    pub cast: Option<String>,
    /// Conditional column: only used for matching, never assigned.
    pub cnd: bool,
    /// Value used when the source lacks the property.
    pub def: Option<Value>,
    /// Override for the prepared value.
    pub init: Option<InitFn>,
    /// Predicate excluding the column from assignments.
    pub skip: Option<SkipFn>,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = Some(cast.into());
        self
    }

    pub fn cnd(mut self, cnd: bool) -> Self {
        self.cnd = cnd;
        self
    }

    pub fn def(mut self, def: impl Into<Value>) -> Self {
        self.def = Some(def.into());
        self
    }

    pub fn init<F>(mut self, init: F) -> Self
    where
        F: Fn(&ColumnDescriptor<'_>) -> FormatResult<Value> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    pub fn skip<F>(mut self, skip: F) -> Self
    where
        F: Fn(&ColumnDescriptor<'_>) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(skip));
        self
    }
}

impl fmt::Debug for ColumnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnConfig")
            .field("name", &self.name)
            .field("prop", &self.prop)
            .field("modifier", &self.modifier)
            .field("cast", &self.cast)
            .field("cnd", &self.cnd)
            .field("def", &self.def)
            .field("init", &self.init.is_some())
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

/// What `init` and `skip` callbacks see about a column and its source row.
#[derive(Debug)]
pub struct ColumnDescriptor<'a> {
    /// The source row.
    pub source: &'a Object,
    /// Effective source property (`prop`, else `name`).
    pub name: &'a str,
    /// The property value, else the column default, else `None`.
    pub value: Option<Value>,
    /// Whether the source has the property (own or inherited).
    pub exists: bool,
    /// The column being resolved.
    pub column: &'a Column,
}

/// An immutable column descriptor.
#[derive(Clone)]
pub struct Column {
    name: String,
    prop: Option<String>,
    modifier: Option<&'static str>,
    cast: Option<String>,
    cnd: bool,
    def: Option<Value>,
    init: Option<InitFn>,
    skip: Option<SkipFn>,
    variable: OnceLock<String>,
    cast_text: OnceLock<String>,
    escaped_name: OnceLock<String>,
}

impl Column {
    /// Parse the shorthand form: an optional leading `?` (conditional), the
    /// name, and an optional modifier, e.g. `?id`, `data:json`, `raw_sql^`.
    pub fn new(shorthand: &str) -> FormatResult<Self> {
        let caps = column_re().captures(shorthand).ok_or_else(|| {
            FormatError::syntax(format!("Invalid column syntax: {shorthand:?}."))
        })?;
        let cnd = shorthand.starts_with('?');
        let start = usize::from(cnd);
        let (end, modifier) = match caps.get(1) {
            Some(m) => (m.start(), modifier_token(m.as_str())),
            None => (shorthand.len(), None),
        };
        Ok(Self::build(
            shorthand[start..end].to_string(),
            None,
            modifier,
            None,
            cnd,
            None,
            None,
            None,
        ))
    }

    /// Validate and build a column from its plain description.
    pub fn from_config(config: ColumnConfig) -> FormatResult<Self> {
        let ColumnConfig {
            name,
            prop,
            modifier,
            cast,
            cnd,
            def,
            init,
            skip,
        } = config;

        if name.is_empty() {
            return Err(FormatError::type_error(
                "Invalid 'name' value: \"\". A non-empty string was expected.",
            ));
        }
        if prop.is_none() && !is_valid_variable(&name) {
            return Err(FormatError::type_error(format!(
                "Invalid 'name' syntax: {name:?}."
            )));
        }
        if let Some(p) = &prop {
            if !is_valid_variable(p) {
                return Err(FormatError::type_error(format!(
                    "Invalid 'prop' syntax: {p:?}."
                )));
            }
        }
        let modifier = match modifier {
            Some(m) => Some(
                modifier_token(&m)
                    .ok_or_else(|| FormatError::syntax(format!("Invalid 'mod' value: {m:?}.")))?,
            ),
            None => None,
        };
        let cast = cast.as_deref().map(parse_cast).transpose()?;

        Ok(Self::build(name, prop, modifier, cast, cnd, def, init, skip))
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        name: String,
        prop: Option<String>,
        modifier: Option<&'static str>,
        cast: Option<String>,
        cnd: bool,
        def: Option<Value>,
        init: Option<InitFn>,
        skip: Option<SkipFn>,
    ) -> Self {
        Self {
            name,
            prop,
            modifier,
            cast,
            cnd,
            def,
            init,
            skip,
            variable: OnceLock::new(),
            cast_text: OnceLock::new(),
            escaped_name: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prop(&self) -> Option<&str> {
        self.prop.as_deref()
    }

    /// Property read from source rows: `prop`, else `name`.
    pub fn source_name(&self) -> &str {
        self.prop.as_deref().unwrap_or(&self.name)
    }

    /// Modifier token as written, if any.
    pub fn modifier_token(&self) -> Option<&'static str> {
        self.modifier
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
            .and_then(Modifier::from_token)
            .unwrap_or_default()
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn is_conditional(&self) -> bool {
        self.cnd
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.def.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.def.is_some()
    }

    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    pub fn has_skip(&self) -> bool {
        self.skip.is_some()
    }

    /// Named template variable, e.g. `${name:json}`.
    pub fn variable(&self) -> &str {
        self.variable.get_or_init(|| {
            format!(
                "${{{}{}}}",
                self.source_name(),
                self.modifier.unwrap_or_default()
            )
        })
    }

    /// `::cast`, or empty.
    pub fn cast_text(&self) -> &str {
        self.cast_text.get_or_init(|| match &self.cast {
            Some(cast) => format!("::{cast}"),
            None => String::new(),
        })
    }

    /// Double-quoted column name.
    pub fn escaped_name(&self) -> &str {
        self.escaped_name.get_or_init(|| quote_name(&self.name))
    }

    pub(crate) fn describe<'a>(&'a self, source: &'a Object) -> ColumnDescriptor<'a> {
        let name = self.source_name();
        let found = source.get(name).cloned();
        let exists = found.is_some();
        let value = if exists { found } else { self.def.clone() };
        ColumnDescriptor {
            source,
            name,
            value,
            exists,
            column: self,
        }
    }

    pub(crate) fn init_value(&self, descriptor: &ColumnDescriptor<'_>) -> Option<FormatResult<Value>> {
        self.init.as_ref().map(|init| init(descriptor))
    }

    pub(crate) fn should_skip(&self, source: Option<&Object>) -> bool {
        match (&self.skip, source) {
            (Some(skip), Some(source)) => skip(&self.describe(source)),
            _ => false,
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("prop", &self.prop)
            .field("modifier", &self.modifier)
            .field("cast", &self.cast)
            .field("cnd", &self.cnd)
            .field("def", &self.def)
            .field("init", &self.init.is_some())
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

/// Anything a column set can be built from.
#[derive(Debug)]
pub enum ColumnInput {
    /// Shorthand string, see [`Column::new`]
    Name(String),
    /// Plain description, see [`Column::from_config`]
    Config(ColumnConfig),
    /// Already built column
    Column(Arc<Column>),
}

impl ColumnInput {
    pub(crate) fn into_column(self) -> FormatResult<Arc<Column>> {
        match self {
            ColumnInput::Name(s) => Column::new(&s).map(Arc::new),
            ColumnInput::Config(c) => Column::from_config(c).map(Arc::new),
            ColumnInput::Column(c) => Ok(c),
        }
    }
}

impl From<&str> for ColumnInput {
    fn from(s: &str) -> Self {
        ColumnInput::Name(s.to_string())
    }
}

impl From<String> for ColumnInput {
    fn from(s: String) -> Self {
        ColumnInput::Name(s)
    }
}

impl From<&String> for ColumnInput {
    fn from(s: &String) -> Self {
        ColumnInput::Name(s.clone())
    }
}

impl From<ColumnConfig> for ColumnInput {
    fn from(c: ColumnConfig) -> Self {
        ColumnInput::Config(c)
    }
}

impl From<Column> for ColumnInput {
    fn from(c: Column) -> Self {
        ColumnInput::Column(Arc::new(c))
    }
}

impl From<Arc<Column>> for ColumnInput {
    fn from(c: Arc<Column>) -> Self {
        ColumnInput::Column(c)
    }
}

impl From<&Arc<Column>> for ColumnInput {
    fn from(c: &Arc<Column>) -> Self {
        ColumnInput::Column(Arc::clone(c))
    }
}
