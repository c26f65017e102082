use pgfmt::{FormatOptions, Modifier, Object, Raw, ToPostgres, Value, FormatResult, format, format_value, format_with};

#[derive(Debug)]
struct Injected(&'static str);

impl ToPostgres for Injected {
    fn to_postgres(&self) -> FormatResult<Value> {
        Ok(Value::from(self.0))
    }

    fn raw_type(&self) -> bool {
        true
    }
}

#[test]
fn partial_twice_equals_once() {
    let query = "select ${a}, $(b:json), $<c^> from t where x = ${a}";
    let full = Value::from(Object::new().with("a", "it's").with("b", vec![1, 2]).with("c", "now()"));
    let first = Value::from(Object::new().with("a", "it's"));
    let rest = Value::from(Object::new().with("b", vec![1, 2]).with("c", "now()"));

    let partial = FormatOptions::new().partial(true);
    let step = format_with(query, &first, &partial).unwrap();
    assert_eq!(step, "select 'it''s', $(b:json), $<c^> from t where x = 'it''s'");
    let twice = format(&step, &rest).unwrap();
    assert_eq!(twice, format(query, &full).unwrap());
}

#[test]
fn special_numbers() {
    let opts = FormatOptions::default();
    assert_eq!(format_value(&Value::from(-0.0), Modifier::None, &opts).unwrap(), "0");
    assert_eq!(format_value(&Value::from(f64::NAN), Modifier::None, &opts).unwrap(), "'NaN'");
    assert_eq!(
        format_value(&Value::from(f64::INFINITY), Modifier::None, &opts).unwrap(),
        "'+Infinity'"
    );
    assert_eq!(format("select $1", &Value::from(-0.0)).unwrap(), "select 0");
}

#[test]
fn raw_custom_values_are_not_escaped() {
    let values = Value::from([Value::custom(Injected("a'b")), Value::from("a'b")]);
    let sql = format("select $1, $2", &values).unwrap();
    assert_eq!(sql, "select a'b, 'a''b'");

    let sql = format("select $1", &Value::from([Value::from(Raw::new("count(*)"))])).unwrap();
    assert_eq!(sql, "select count(*)");
}

#[test]
fn substituted_text_is_not_rescanned() {
    let values = Value::from(["$2", "x"]);
    let sql = format("select $1, $2", &values).unwrap();
    assert_eq!(sql, "select '$2', 'x'");

    let named = Value::from(Object::new().with("a", "${b}").with("b", 1));
    assert_eq!(format("${a} ${b}", &named).unwrap(), "'${b}' 1");
}

#[test]
fn defaults_fill_missing_variables() {
    let opts = FormatOptions::new().default_with(|missing| match missing {
        pgfmt::Missing::Index { index, .. } => Ok(Value::from(*index as i64)),
        pgfmt::Missing::Property { name, .. } => Ok(Value::from(name.to_uppercase())),
    });
    let sql = format_with("$1 $3", &Value::from([10]), &opts).unwrap();
    assert_eq!(sql, "10 2");
    let sql = format_with("${x}", &Value::from(Object::new()), &opts).unwrap();
    assert_eq!(sql, "'X'");
}

#[cfg(feature = "tracing")]
#[test]
fn fallbacks_emit_trace_events() {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::util::SubscriberInitExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let writer = captured.clone();
    let _guard = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .set_default();

    let defaults = FormatOptions::new().default_value(0);
    assert_eq!(format_with("$1 $2", &Value::from([1]), &defaults).unwrap(), "1 0");
    assert_eq!(format_with("${x}", &Value::from(Object::new()), &defaults).unwrap(), "0");
    let partial = FormatOptions::new().partial(true);
    assert_eq!(format_with("$2", &Value::from([1]), &partial).unwrap(), "$2");

    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("positional variable filled from default"), "{log}");
    assert!(log.contains("named variable filled from default"), "{log}");
    assert!(log.contains("positional variable left verbatim"), "{log}");
    assert!(log.contains("pgfmt.format"), "{log}");
}
