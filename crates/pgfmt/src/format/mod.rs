//! Value formatting and query templating.
//!
//! [`format_value`] turns one [`Value`](crate::Value) into SQL text; [`format`]
//! and [`format_with`] substitute the variables of a query template.

pub mod config;
pub mod modifier;
pub mod template;
pub mod value;

pub use config::{Fallback, FormatOptions, Missing};
pub use modifier::Modifier;
pub use template::{MAX_VARIABLE, format, format_with};
pub use value::{
    as_alias, as_array, as_bool, as_bytes, as_csv, as_date, as_json, as_name, as_number,
    as_open_value, as_text, format_value, quote_name,
};
