use crate::error::FormatResult;
use crate::value::{Object, Value};
use std::fmt;
use std::sync::Arc;

/// Options for template formatting.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Render generated SQL keywords (and `ARRAY[`) in upper case. `None`
    /// means lower case, or the enclosing builder's setting under `concat`.
    pub cap_sql: Option<bool>,
    /// Leave unresolved variables verbatim instead of failing.
    pub partial: bool,
    /// Substitute unresolved variables from this fallback. Takes precedence
    /// over `partial`.
    pub default: Option<Fallback>,
}

impl FormatOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set upper-case SQL generation.
    pub fn cap_sql(mut self, cap_sql: bool) -> Self {
        self.cap_sql = Some(cap_sql);
        self
    }

    pub fn is_cap_sql(&self) -> bool {
        self.cap_sql.unwrap_or(false)
    }

    /// Allow partial formatting.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Use a fixed value for every unresolved variable.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(Fallback::Value(value.into()));
        self
    }

    /// Compute the value of each unresolved variable.
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Missing<'_>) -> FormatResult<Value> + Send + Sync + 'static,
    {
        self.default = Some(Fallback::Func(Arc::new(f)));
        self
    }
}

/// Replacement for variables that cannot be resolved.
#[derive(Clone)]
pub enum Fallback {
    Value(Value),
    Func(Arc<dyn Fn(&Missing<'_>) -> FormatResult<Value> + Send + Sync>),
}

impl Fallback {
    pub(crate) fn resolve(&self, missing: &Missing<'_>) -> FormatResult<Value> {
        match self {
            Fallback::Value(v) => Ok(v.clone()),
            Fallback::Func(f) => f(missing),
        }
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Fallback::Func(_) => f.debug_tuple("Func").field(&"<fn>").finish(),
        }
    }
}

/// The variable a [`Fallback::Func`] is asked to supply.
#[derive(Debug)]
pub enum Missing<'a> {
    /// Positional variable; `index` is 0-based.
    Index { index: usize, values: &'a [Value] },
    /// Named variable (full dotted path).
    Property { name: &'a str, object: &'a Object },
}
