//! Dynamic application values accepted by the formatter.
//!
//! [`Value`] is the single input type of every formatting entry point. It is
//! deliberately close to what a query author hands over at runtime: scalars,
//! dates, byte strings, arbitrarily nested arrays, ordered objects, lazily
//! computed values and opaque domain types implementing [`ToPostgres`].
//!
//! "Missing" is not a variant: absence is expressed with `Option` at the call
//! site, or by a key that is not present in an [`Object`].

mod json;
mod object;

pub use object::Object;

use crate::ctf::ToPostgres;
use crate::error::FormatResult;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::sync::Arc;

/// A value that can be formatted into SQL text.
#[derive(Clone, Debug)]
pub enum Value {
    /// SQL `null`
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// Integer outside the `i64` range
    BigInt(i128),
    /// Double precision float, including `NaN` and the infinities
    Float(f64),
    /// Arbitrary precision decimal
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    /// Text
    Text(String),
    /// Timestamp, rendered in UTC
    Date(DateTime<Utc>),
    /// Byte sequence, rendered as `\x`-prefixed hex
    Bytes(Bytes),
    /// Array of any depth
    Array(Vec<Value>),
    /// Ordered property bag, rendered as JSON
    Object(Object),
    /// Value computed on demand
    Lazy(LazyValue),
    /// Domain type supplying its own formatting
    Custom(Arc<dyn ToPostgres>),
}

impl Value {
    /// Wrap a synchronous closure that produces the value when formatted.
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> FormatResult<Value> + Send + Sync + 'static,
    {
        Value::Lazy(LazyValue::new(f))
    }

    /// Wrap a type implementing the custom formatting protocol.
    pub fn custom<T: ToPostgres + 'static>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Create a byte-sequence value.
    pub fn bytes(value: impl Into<Bytes>) -> Self {
        Value::Bytes(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::BigInt(_) | Value::Float(_) => "number",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "number",
            Value::Text(_) => "string",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Lazy(_) => "function",
            Value::Custom(_) => "custom",
        }
    }

    /// JSON rendition for diagnostics; never fails.
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Lazy(_) => "function".to_string(),
            _ => serde_json::to_string(self).unwrap_or_else(|_| self.type_name().to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            #[cfg(feature = "rust_decimal")]
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => Arc::ptr_eq(&a.0, &b.0),
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A value produced by a synchronous closure at formatting time.
#[derive(Clone)]
pub struct LazyValue(Arc<dyn Fn() -> FormatResult<Value> + Send + Sync>);

impl LazyValue {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> FormatResult<Value> + Send + Sync + 'static,
    {
        LazyValue(Arc::new(f))
    }

    /// Invoke the closure once.
    pub fn call(&self) -> FormatResult<Value> {
        (self.0)()
    }

    /// Invoke repeatedly until the result is no longer lazy.
    pub fn resolve(&self) -> FormatResult<Value> {
        let mut value = self.call()?;
        while let Value::Lazy(next) = value {
            value = next.call()?;
        }
        Ok(value)
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyValue").field(&"<fn>").finish()
    }
}

// ─── Conversions ────────────────────────────────────────────────────────────

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(i128::from(v)),
        }
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(v),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Date(v.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

/// Byte slices are binary data. `Vec<u8>` converts as an array of numbers;
/// use [`Value::bytes`] for owned buffers.
impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<LazyValue> for Value {
    fn from(v: LazyValue) -> Self {
        Value::Lazy(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}
