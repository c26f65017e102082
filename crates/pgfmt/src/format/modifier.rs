use crate::error::{FormatError, FormatResult};
use std::fmt;
use std::str::FromStr;

/// Modifier tokens in the order they are matched after a variable name.
pub(crate) const MODIFIER_TOKENS: [&str; 10] = [
    "^", "~", "#", ":raw", ":alias", ":name", ":json", ":csv", ":list", ":value",
];

/// Alternate encoding strategy selected by a variable suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// Type-based dispatch
    #[default]
    None,
    /// `^` / `:raw`: inject without quoting or escaping
    Raw,
    /// `:alias`: SQL alias, quoted only when needed
    Alias,
    /// `~` / `:name`: SQL name(s), always quoted
    Name,
    /// `:json`: JSON text
    Json,
    /// `:csv` / `:list`: comma-separated values
    Csv,
    /// `#` / `:value`: open value, escaped without quotes
    Value,
}

impl Modifier {
    /// Map a suffix token to its modifier.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "^" | ":raw" => Modifier::Raw,
            ":alias" => Modifier::Alias,
            "~" | ":name" => Modifier::Name,
            ":json" => Modifier::Json,
            ":csv" | ":list" => Modifier::Csv,
            "#" | ":value" => Modifier::Value,
            _ => return None,
        })
    }

    /// Canonical suffix token; empty for [`Modifier::None`].
    pub fn as_token(&self) -> &'static str {
        match self {
            Modifier::None => "",
            Modifier::Raw => "^",
            Modifier::Alias => ":alias",
            Modifier::Name => "~",
            Modifier::Json => ":json",
            Modifier::Csv => ":csv",
            Modifier::Value => "#",
        }
    }
}

impl FromStr for Modifier {
    type Err = FormatError;

    fn from_str(s: &str) -> FormatResult<Self> {
        Modifier::from_token(s)
            .ok_or_else(|| FormatError::syntax(format!("Invalid modifier: {s:?}")))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Match a modifier token at the start of `s`.
pub(crate) fn leading_modifier(s: &str) -> Option<&'static str> {
    MODIFIER_TOKENS.iter().copied().find(|t| s.starts_with(t))
}

/// Modifier plus the raw flag, the two axes a variable can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Flags {
    pub modifier: Modifier,
    pub raw: bool,
}

impl Flags {
    pub fn new(modifier: Modifier, raw: bool) -> Self {
        match modifier {
            Modifier::Raw => Self {
                modifier: Modifier::None,
                raw: true,
            },
            _ => Self { modifier, raw },
        }
    }

    pub fn raw() -> Self {
        Self {
            modifier: Modifier::None,
            raw: true,
        }
    }

    pub fn with_raw(self, raw: bool) -> Self {
        Self {
            raw: self.raw || raw,
            ..self
        }
    }
}
