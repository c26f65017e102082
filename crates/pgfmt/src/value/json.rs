//! JSON encoding of [`Value`] and conversion from `serde_json::Value`.

use super::{Object, Value};
use chrono::SecondsFormat;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

// Integral floats below this magnitude serialize as integers (`1`, not `1.0`,
// `10000000000000000`, not `1e16`). From here on exponent notation is used.
const MAX_PLAIN_INTEGER: f64 = 1e21;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::BigInt(i) => serializer.serialize_i128(*i),
            Value::Float(f) if !f.is_finite() => serializer.serialize_unit(),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < MAX_PLAIN_INTEGER => {
                serializer.serialize_i128(*f as i128)
            }
            Value::Float(f) => serializer.serialize_f64(*f),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => serializer.collect_str(d),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Bytes(b) => serializer.serialize_str(&format!("\\x{}", hex::encode(b))),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(obj) => obj.serialize(serializer),
            Value::Lazy(lazy) => lazy
                .resolve()
                .map_err(S::Error::custom)?
                .serialize(serializer),
            Value::Custom(c) => c
                .to_postgres()
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::BigInt(i128::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn serializes_like_json_stringify() {
        let obj = Object::new()
            .with("a", 1)
            .with("b", 1.5)
            .with("c", 2.0)
            .with("d", f64::NAN)
            .with("e", "it's")
            .with("f", Value::Null);
        assert_eq!(
            serde_json::to_string(&Value::Object(obj)).unwrap(),
            r#"{"a":1,"b":1.5,"c":2,"d":null,"e":"it's","f":null}"#
        );
    }

    #[test]
    fn whole_floats_print_without_exponent() {
        assert_eq!(serde_json::to_string(&Value::from(1e16)).unwrap(), "10000000000000000");
        assert_eq!(
            serde_json::to_string(&Value::from(-123e18)).unwrap(),
            "-123000000000000000000"
        );
        assert_eq!(serde_json::to_string(&Value::from(-0.0)).unwrap(), "0");
    }

    #[test]
    fn dates_use_iso_millis() {
        let d = Utc.with_ymd_and_hms(2021, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            serde_json::to_string(&Value::from(d)).unwrap(),
            r#""2021-05-06T07:08:09.000Z""#
        );
    }

    #[test]
    fn big_integers_stay_numeric() {
        let v = Value::BigInt(170141183460469231731687303715884105727);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            "170141183460469231731687303715884105727"
        );
    }

    #[test]
    fn converts_from_json_preserving_order() {
        let v = Value::from(json!({"z": [1, "two"], "a": {"b": true}}));
        let obj = v.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(
            obj.get("z"),
            Some(&Value::Array(vec![Value::Int(1), Value::Text("two".into())]))
        );
    }
}
