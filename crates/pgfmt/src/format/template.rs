//! Query templates.
//!
//! The shape of the values argument selects one of three addressing modes:
//!
//! - an array: positional variables `$1`, `$2`, ... (1-based, at most `$100000`)
//! - an object: named variables `${name}`, `$(name)`, `$<name>`, `$[name]` or
//!   `$/name/`, with dotted paths into nested objects and `this` for the whole
//!   object
//! - anything else: the single variable `$1`
//!
//! Any variable can carry a modifier suffix (`^ ~ # :raw :alias :name :json
//! :csv :list :value`). Each template is scanned once; substituted text is
//! never scanned again.

use super::config::{FormatOptions, Missing};
use super::modifier::{Flags, Modifier, leading_modifier};
use super::value::render;
use crate::error::{FormatError, FormatResult};
use crate::value::{Object, Value};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Highest supported positional variable.
pub const MAX_VARIABLE: u64 = 100_000;

// Longer digit runs are not treated as variables at all.
const MAX_VARIABLE_DIGITS: usize = 17;

fn positional_re() -> &'static Regex {
    static POSITIONAL_RE: OnceLock<Regex> = OnceLock::new();
    POSITIONAL_RE.get_or_init(|| {
        Regex::new(r"\$(\d+)(\^|~|#|:raw|:alias|:name|:json|:csv|:list|:value)?")
            .expect("invalid built-in positional variable regex")
    })
}

/// Format a template with default options.
///
/// `values` may be `None` (the template is returned unchanged), an array,
/// an object or a single value.
///
/// ```ignore
/// use pgfmt::{format, Object, Value};
///
/// let sql = format("select * from users where id = $1", &Value::from(5))?;
/// assert_eq!(sql, "select * from users where id = 5");
///
/// let row = Value::from(Object::new().with("name", "O'Hara"));
/// let sql = format("select * from users where name = ${name}", &row)?;
/// assert_eq!(sql, "select * from users where name = 'O''Hara'");
/// ```
pub fn format<'a>(query: &str, values: impl Into<Option<&'a Value>>) -> FormatResult<String> {
    format_query(query, values.into(), false, &FormatOptions::default())
}

/// Format a template with explicit options.
pub fn format_with<'a>(
    query: &str,
    values: impl Into<Option<&'a Value>>,
    options: &FormatOptions,
) -> FormatResult<String> {
    format_query(query, values.into(), false, options)
}

pub(crate) fn format_query(
    query: &str,
    values: Option<&Value>,
    raw: bool,
    options: &FormatOptions,
) -> FormatResult<String> {
    let Some(values) = values else {
        return Ok(query.to_string());
    };
    match values {
        Value::Custom(c) => {
            let inner = c.to_postgres()?;
            format_query(query, Some(&inner), raw || c.raw_type(), options)
        }
        Value::Array(items) => format_positional(query, items, raw, options),
        Value::Object(obj) => format_named(query, obj, raw, options),
        other => format_single(query, other, raw, options),
    }
}

fn token_flags(modifier: Option<&str>, raw: bool) -> Flags {
    let modifier = modifier.and_then(Modifier::from_token).unwrap_or_default();
    Flags::new(modifier, false).with_raw(raw)
}

/// Run `f` for every `$<digits><modifier>?` token. `None` keeps the token.
fn replace_numbered<F>(query: &str, mut f: F) -> FormatResult<String>
where
    F: FnMut(&Captures<'_>) -> FormatResult<Option<String>>,
{
    let mut out = String::with_capacity(query.len());
    let mut last = 0;
    for caps in positional_re().captures_iter(query) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&query[last..whole.start()]);
        match f(&caps)? {
            Some(text) => out.push_str(&text),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&query[last..]);
    Ok(out)
}

fn format_positional(
    query: &str,
    values: &[Value],
    raw: bool,
    options: &FormatOptions,
) -> FormatResult<String> {
    replace_numbered(query, |caps| {
        let digits = &caps[1];
        if digits.starts_with('0') || digits.len() > MAX_VARIABLE_DIGITS {
            return Ok(None);
        }
        let n: u64 = digits
            .parse()
            .map_err(|_| FormatError::range(format!("Invalid variable ${digits}")))?;
        if n > MAX_VARIABLE {
            return Err(FormatError::range(format!(
                "Variable ${n} exceeds supported maximum of ${MAX_VARIABLE}"
            )));
        }
        let flags = token_flags(caps.get(2).map(|m| m.as_str()), raw);
        let index = (n - 1) as usize;
        if let Some(value) = values.get(index) {
            return render(value, flags, options).map(Some);
        }
        if let Some(fallback) = &options.default {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "pgfmt.format", variable = n, "positional variable filled from default");
            let value = fallback.resolve(&Missing::Index { index, values })?;
            return render(&value, flags, options).map(Some);
        }
        if options.partial {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "pgfmt.format", variable = n, "positional variable left verbatim");
            return Ok(None);
        }
        Err(FormatError::range(format!(
            "Variable ${n} out of range. Parameters array length: {}",
            values.len()
        )))
    })
}

fn format_single(
    query: &str,
    value: &Value,
    raw: bool,
    options: &FormatOptions,
) -> FormatResult<String> {
    replace_numbered(query, |caps| {
        if &caps[1] != "1" {
            return Ok(None);
        }
        let flags = token_flags(caps.get(2).map(|m| m.as_str()), raw);
        render(value, flags, options).map(Some)
    })
}

/// A named variable located in a template.
#[derive(Debug, PartialEq, Eq)]
struct NamedToken<'q> {
    start: usize,
    end: usize,
    name: &'q str,
    modifier: Option<&'static str>,
}

fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '{' => Some('}'),
        '(' => Some(')'),
        '<' => Some('>'),
        '[' => Some(']'),
        '/' => Some('/'),
        _ => None,
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'$' || b == b'_' || b == b'.'
}

fn whitespace_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(s.len(), |(i, _)| i)
}

/// Parse `$<open> name<modifier>? <close>` starting at the `$` at `start`.
fn parse_named_at(query: &str, start: usize) -> Option<NamedToken<'_>> {
    let rest = &query[start + 1..];
    let open = rest.chars().next()?;
    let close = closing_delimiter(open)?;

    let mut pos = open.len_utf8();
    pos += whitespace_len(&rest[pos..]);

    let name_len = rest[pos..].bytes().take_while(|b| is_name_byte(*b)).count();
    if name_len == 0 {
        return None;
    }
    let name = &rest[pos..pos + name_len];
    pos += name_len;

    let modifier = leading_modifier(&rest[pos..]);
    if let Some(m) = modifier {
        pos += m.len();
    }
    pos += whitespace_len(&rest[pos..]);

    if !rest[pos..].starts_with(close) {
        return None;
    }
    pos += close.len_utf8();

    Some(NamedToken {
        start,
        end: start + 1 + pos,
        name,
        modifier,
    })
}

fn named_tokens(query: &str) -> impl Iterator<Item = NamedToken<'_>> {
    let bytes = query.as_bytes();
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < bytes.len() {
            if bytes[i] == b'$' {
                if let Some(token) = parse_named_at(query, i) {
                    i = token.end;
                    return Some(token);
                }
            }
            i += 1;
        }
        None
    })
}

pub(crate) fn format_named(
    query: &str,
    obj: &Object,
    raw: bool,
    options: &FormatOptions,
) -> FormatResult<String> {
    let mut out = String::with_capacity(query.len());
    let mut last = 0;
    for token in named_tokens(query) {
        out.push_str(&query[last..token.start]);
        let flags = token_flags(token.modifier, raw);
        match lookup(obj, token.name, flags, options)? {
            Some(text) => out.push_str(&text),
            None => match &options.default {
                Some(fallback) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(target: "pgfmt.format", variable = token.name, "named variable filled from default");
                    let value = fallback.resolve(&Missing::Property {
                        name: token.name,
                        object: obj,
                    })?;
                    out.push_str(&render(&value, flags, options)?);
                }
                None if options.partial => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(target: "pgfmt.format", variable = token.name, "named variable left verbatim");
                    out.push_str(&query[token.start..token.end]);
                }
                None => return Err(FormatError::MissingProperty(token.name.to_string())),
            },
        }
        last = token.end;
    }
    out.push_str(&query[last..]);
    Ok(out)
}

/// Resolve and render a named variable; `None` when the property is missing.
fn lookup(
    obj: &Object,
    name: &str,
    flags: Flags,
    options: &FormatOptions,
) -> FormatResult<Option<String>> {
    if name == "this" {
        return render(&Value::Object(obj.clone()), flags, options).map(Some);
    }
    if !name.contains('.') {
        return match obj.get(name) {
            Some(value) => render(value, flags, options).map(Some),
            None => Ok(None),
        };
    }
    let segments: Vec<&str> = name.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(FormatError::InvalidProperty(name.to_string()));
    }
    let (head, tail) = segments.split_at(1);
    let Some(root) = obj.get(head[0]) else {
        return Ok(None);
    };
    match walk(root, tail)? {
        Some(value) => render(&value, flags, options).map(Some),
        None => Ok(None),
    }
}

fn walk(value: &Value, segments: &[&str]) -> FormatResult<Option<Value>> {
    let Some((head, tail)) = segments.split_first() else {
        return Ok(Some(value.clone()));
    };
    match value {
        Value::Object(obj) => match obj.get(head) {
            Some(child) => walk(child, tail),
            None => Ok(None),
        },
        Value::Lazy(lazy) => walk(&lazy.resolve()?, segments),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_token_all_delimiters() {
        for t in ["${a}", "$(a)", "$<a>", "$[a]", "$/a/"] {
            let tok = parse_named_at(t, 0).unwrap();
            assert_eq!(tok.name, "a");
            assert_eq!(tok.end, t.len());
        }
    }

    #[test]
    fn named_token_rejects_mismatched_delimiters() {
        assert!(parse_named_at("${a)", 0).is_none());
        assert!(parse_named_at("$(a]", 0).is_none());
        assert!(parse_named_at("${}", 0).is_none());
        assert!(parse_named_at("${a:jsonx}", 0).is_none());
    }

    #[test]
    fn named_token_whitespace_and_modifier() {
        let tok = parse_named_at("$(  a.b:json  ) tail", 0).unwrap();
        assert_eq!(tok.name, "a.b");
        assert_eq!(tok.modifier, Some(":json"));
        assert_eq!(tok.end, "$(  a.b:json  )".len());
    }

    #[test]
    fn scanner_skips_plain_dollars() {
        let toks: Vec<_> = named_tokens("$$ ${a} $1 $b ${c^}").collect();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].name, "a");
        assert_eq!(toks[1].name, "c");
        assert_eq!(toks[1].modifier, Some("^"));
    }
}
