//! Value formatting: one [`Value`] in, one SQL text fragment out.
//!
//! Quoting rules are the injection defense of the whole crate: text is wrapped
//! in single quotes with every embedded `'` doubled, identifiers are wrapped in
//! double quotes with every embedded `"` doubled. Nothing else is escaped.

use super::config::FormatOptions;
use super::modifier::{Flags, Modifier};
use crate::error::{FormatError, FormatResult};
use crate::value::Value;
use chrono::{DateTime, Datelike, Utc};
use std::borrow::Cow;

/// Format a single value, optionally through a modifier.
///
/// ```ignore
/// use pgfmt::{format_value, FormatOptions, Modifier, Value};
///
/// let opts = FormatOptions::default();
/// assert_eq!(format_value(&"O'Hara".into(), Modifier::None, &opts)?, "'O''Hara'");
/// assert_eq!(format_value(&(-5).into(), Modifier::None, &opts)?, "(-5)");
/// assert_eq!(format_value(&"col".into(), Modifier::Name, &opts)?, "\"col\"");
/// ```
pub fn format_value(
    value: &Value,
    modifier: Modifier,
    options: &FormatOptions,
) -> FormatResult<String> {
    render(value, Flags::new(modifier, false), options)
}

pub(crate) fn render(value: &Value, flags: Flags, options: &FormatOptions) -> FormatResult<String> {
    match value {
        Value::Lazy(lazy) => render(&lazy.resolve()?, flags, options),
        Value::Custom(c) => render(&c.to_postgres()?, flags.with_raw(c.raw_type()), options),
        _ => match flags.modifier {
            Modifier::Alias => as_alias(value),
            Modifier::Name => as_name(value),
            Modifier::Json => as_json(value, flags.raw),
            Modifier::Csv => as_csv(value, options),
            Modifier::Value => as_open_value(value, options),
            Modifier::None | Modifier::Raw => render_typed(value, flags.raw, options),
        },
    }
}

fn render_typed(value: &Value, raw: bool, options: &FormatOptions) -> FormatResult<String> {
    match value {
        Value::Null => null_text(raw),
        Value::Bool(b) => Ok(as_bool(*b).to_string()),
        Value::Int(_) | Value::BigInt(_) | Value::Float(_) => as_number(value),
        #[cfg(feature = "rust_decimal")]
        Value::Decimal(_) => as_number(value),
        Value::Text(s) => Ok(text(s, raw)),
        Value::Date(d) => Ok(as_date(d, raw)),
        Value::Bytes(b) => Ok(as_bytes(b, raw)),
        Value::Array(items) => as_array(items, options),
        Value::Object(_) => json_text(value, raw),
        Value::Lazy(_) | Value::Custom(_) => render(value, Flags::new(Modifier::None, raw), options),
    }
}

fn resolved(value: &Value) -> FormatResult<Cow<'_, Value>> {
    match value {
        Value::Lazy(lazy) => Ok(Cow::Owned(lazy.resolve()?)),
        _ => Ok(Cow::Borrowed(value)),
    }
}

fn null_text(raw: bool) -> FormatResult<String> {
    if raw {
        return Err(FormatError::type_error(
            "Values null/undefined cannot be used as raw text.",
        ));
    }
    Ok("null".to_string())
}

/// Double every single quote.
pub(crate) fn escape_text(s: &str) -> String {
    s.replace('\'', "''")
}

fn wrap(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    out.push_str(s);
    out.push('\'');
    out
}

fn text(s: &str, raw: bool) -> String {
    if raw {
        s.to_string()
    } else {
        wrap(&escape_text(s))
    }
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}

/// Format any value as text. Non-text values use their JSON rendition.
pub fn as_text(value: &Value, raw: bool) -> FormatResult<String> {
    let value = resolved(value)?;
    match &*value {
        Value::Null => null_text(raw),
        Value::Text(s) => Ok(text(s, raw)),
        other => Ok(text(&serde_json::to_string(other)?, raw)),
    }
}

pub fn as_bool(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}

fn wrap_negative(s: String, negative: bool) -> String {
    if negative { format!("({s})") } else { s }
}

/// Decimal text; negative values are parenthesized and non-finite floats
/// become quoted literals.
pub fn as_number(value: &Value) -> FormatResult<String> {
    match value {
        Value::Int(i) => Ok(wrap_negative(i.to_string(), *i < 0)),
        Value::BigInt(i) => Ok(wrap_negative(i.to_string(), *i < 0)),
        Value::Float(f) => Ok(float_text(*f)),
        #[cfg(feature = "rust_decimal")]
        Value::Decimal(d) => {
            if d.is_zero() {
                Ok(d.abs().to_string())
            } else {
                Ok(wrap_negative(d.to_string(), d.is_sign_negative()))
            }
        }
        other => Err(FormatError::type_error(format!(
            "Invalid number: {}",
            other.describe()
        ))),
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "'NaN'".to_string()
    } else if f == f64::INFINITY {
        "'+Infinity'".to_string()
    } else if f == f64::NEG_INFINITY {
        "'-Infinity'".to_string()
    } else if f == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        wrap_negative(f.to_string(), f < 0.0)
    }
}

/// UTC timestamp text, e.g. `2020-01-02T03:04:05.006+00:00`.
pub fn as_date(d: &DateTime<Utc>, raw: bool) -> String {
    let year = d.year();
    let bc = year <= 0;
    let mut s = format!(
        "{:04}-{}",
        if bc { 1 - year } else { year },
        d.format("%m-%dT%H:%M:%S%.3f+00:00")
    );
    if bc {
        s.push_str(" BC");
    }
    if raw { s } else { wrap(&s) }
}

/// `\x`-prefixed hex text.
pub fn as_bytes(bytes: &[u8], raw: bool) -> String {
    let s = format!("\\x{}", hex::encode(bytes));
    if raw { s } else { wrap(&s) }
}

/// Array constructor of any depth; a top-level empty array is `'{}'`.
pub fn as_array(items: &[Value], options: &FormatOptions) -> FormatResult<String> {
    if items.is_empty() {
        return Ok("'{}'".to_string());
    }
    let mut out = String::from(if options.is_cap_sql() { "ARRAY" } else { "array" });
    write_array(items, options, &mut out)?;
    Ok(out)
}

fn write_array(items: &[Value], options: &FormatOptions, out: &mut String) -> FormatResult<()> {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match item {
            Value::Array(inner) => write_array(inner, options, out)?,
            _ => out.push_str(&render(item, Flags::default(), options)?),
        }
    }
    out.push(']');
    Ok(())
}

/// JSON text, quoted and escaped unless raw.
pub fn as_json(value: &Value, raw: bool) -> FormatResult<String> {
    let value = resolved(value)?;
    if value.is_null() {
        return null_text(raw);
    }
    json_text(&value, raw)
}

fn json_text(value: &Value, raw: bool) -> FormatResult<String> {
    let s = serde_json::to_string(value)?;
    Ok(text(&s, raw))
}

/// Comma-separated values: array elements, object values, or a single value.
pub fn as_csv(value: &Value, options: &FormatOptions) -> FormatResult<String> {
    let value = resolved(value)?;
    match &*value {
        Value::Array(items) => join_rendered(items.iter(), options),
        Value::Object(obj) => join_rendered(obj.values(), options),
        other => render(other, Flags::default(), options),
    }
}

fn join_rendered<'a>(
    values: impl Iterator<Item = &'a Value>,
    options: &FormatOptions,
) -> FormatResult<String> {
    let parts = values
        .map(|v| render(v, Flags::default(), options))
        .collect::<FormatResult<Vec<_>>>()?;
    Ok(parts.join(","))
}

/// Open value: formatted raw, then single quotes doubled.
pub fn as_open_value(value: &Value, options: &FormatOptions) -> FormatResult<String> {
    let value = resolved(value)?;
    if value.is_null() {
        return Err(FormatError::type_error(
            "Open values cannot be null or undefined.",
        ));
    }
    Ok(escape_text(&render(&value, Flags::raw(), options)?))
}

/// SQL name(s): a string, an array of strings, or the keys of an object.
pub fn as_name(value: &Value) -> FormatResult<String> {
    let value = resolved(value)?;
    match &*value {
        Value::Text(s) if !s.is_empty() => {
            if s.trim() == "*" {
                Ok(s.clone())
            } else {
                Ok(quote_name(s))
            }
        }
        Value::Array(items) if items.is_empty() => Err(empty_names()),
        Value::Array(items) => {
            let names = items
                .iter()
                .map(|item| match item {
                    Value::Text(s) if !s.is_empty() => Ok(quote_name(s)),
                    other => Err(invalid_name(other)),
                })
                .collect::<FormatResult<Vec<_>>>()?;
            Ok(names.join(","))
        }
        Value::Object(obj) if obj.is_empty() => Err(empty_names()),
        Value::Object(obj) => {
            let names = obj
                .keys()
                .map(|k| {
                    if k.is_empty() {
                        Err(invalid_name(&Value::Text(String::new())))
                    } else {
                        Ok(quote_name(k))
                    }
                })
                .collect::<FormatResult<Vec<_>>>()?;
            Ok(names.join(","))
        }
        other => Err(invalid_name(other)),
    }
}

fn empty_names() -> FormatError {
    FormatError::type_error("Cannot retrieve sql names from an empty array/object.")
}

fn invalid_name(value: &Value) -> FormatError {
    FormatError::type_error(format!("Invalid sql name: {}", value.describe()))
}

/// SQL alias: dotted segments, each quoted only when it is not a plain
/// all-lower or all-upper identifier.
pub fn as_alias(value: &Value) -> FormatResult<String> {
    let value = resolved(value)?;
    match &*value {
        Value::Text(s) if !s.is_empty() => Ok(s
            .split('.')
            .filter(|seg| !seg.is_empty())
            .map(|seg| {
                if is_plain_alias(seg) {
                    seg.to_string()
                } else {
                    quote_name(seg)
                }
            })
            .collect::<Vec<_>>()
            .join(".")),
        other => Err(FormatError::type_error(format!(
            "Invalid sql alias: {}",
            other.describe()
        ))),
    }
}

fn is_plain_alias(seg: &str) -> bool {
    let mut chars = seg.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest: Vec<char> = chars.collect();
    let lower = (first == '_' || first.is_ascii_lowercase())
        && rest
            .iter()
            .all(|&c| c == '_' || c == '$' || c.is_ascii_lowercase() || c.is_ascii_digit());
    let upper = (first == '_' || first.is_ascii_uppercase())
        && rest
            .iter()
            .all(|&c| c == '_' || c == '$' || c.is_ascii_uppercase() || c.is_ascii_digit());
    lower || upper
}
