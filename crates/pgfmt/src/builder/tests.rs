use super::*;
use crate::column::{ColumnConfig, ColumnInput};
use crate::error::FormatError;

fn row(a: i32, b: &str) -> Object {
    Object::new().with("a", a).with("b", b)
}

fn id_val(id: i32, val: i32) -> Object {
    Object::new().with("id", id).with("val", val)
}

fn rows(list: Vec<Object>) -> Value {
    Value::from(list)
}

fn table_set(columns: &[&str]) -> ColumnSet {
    ColumnSet::with_options(
        columns.iter().copied(),
        ColumnSetOptions::new().table(TableName::with_schema("s", "t").unwrap()),
    )
    .unwrap()
}

// ==================== insert ====================

#[test]
fn insert_single_row() {
    let data = Value::from(row(1, "x"));
    let sql = insert(&data, &["a", "b"], "a_table").unwrap();
    assert_eq!(sql, r#"insert into "a_table"("a","b") values(1,'x')"#);
}

#[test]
fn insert_cap_sql() {
    let data = Value::from(Object::new().with("a", vec![1, 2]).with("b", "it's"));
    let sql = StatementBuilder::new()
        .cap_sql(true)
        .insert(&data, Columns::Infer, "t")
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO "t"("a","b") VALUES(ARRAY[1,2],'it''s')"#);
}

#[test]
fn insert_infers_columns_from_row() {
    let data = Value::from(row(1, "x"));
    let sql = insert(&data, Columns::Infer, "t").unwrap();
    assert_eq!(sql, r#"insert into "t"("a","b") values(1,'x')"#);
}

#[test]
fn insert_many_rows_uses_set_table() {
    let cs = table_set(&["a", "b"]);
    let data = rows(vec![row(1, "x"), Object::new().with("a", 2).with("b", Value::Null)]);
    let sql = insert(&data, &cs, None::<&str>).unwrap();
    assert_eq!(sql, r#"insert into "s"."t"("a","b") values(1,'x'),(2,null)"#);
}

#[test]
fn insert_explicit_table_wins() {
    let cs = table_set(&["a"]);
    let data = Value::from(row(1, "x"));
    let sql = insert(&data, &cs, "other").unwrap();
    assert_eq!(sql, r#"insert into "other"("a") values(1)"#);
}

#[test]
fn insert_errors() {
    let one = Value::from(row(1, "x"));
    let many = rows(vec![row(1, "x")]);

    let err = insert(&Value::from(5), Columns::Infer, "t").unwrap_err();
    assert_eq!(err, FormatError::Type("Invalid parameter 'data' specified.".into()));

    let err = insert(&Value::from(Vec::<Value>::new()), &["a"], "t").unwrap_err();
    assert_eq!(
        err,
        FormatError::type_error("Cannot generate an INSERT from an empty array.")
    );

    let err = insert(&many, Columns::Infer, "t").unwrap_err();
    assert!(err.is_type());
    assert!(err.to_string().contains("inserting multiple records"));

    let err = insert(&Value::from(Object::new()), Columns::Infer, "t").unwrap_err();
    assert_eq!(err, FormatError::NoColumns("an INSERT"));

    let err = insert(&one, &["a"], None::<&str>).unwrap_err();
    assert_eq!(err, FormatError::UnknownTable);

    let bad = Value::from(vec![Value::from(row(1, "x")), Value::from(3)]);
    let err = insert(&bad, &["a"], "t").unwrap_err();
    assert_eq!(err.to_string(), "Invalid insert object at index 1.");
}

#[test]
fn insert_missing_property_needs_default() {
    let data = Value::from(Object::new().with("a", 1));
    let err = insert(&data, &["a", "b"], "t").unwrap_err();
    assert!(err.is_missing_property());

    let cs = ColumnSet::new([
        ColumnInput::from("a"),
        ColumnConfig::new("b").def("none").into(),
    ])
    .unwrap();
    let sql = insert(&data, &cs, "t").unwrap();
    assert_eq!(sql, r#"insert into "t"("a","b") values(1,'none')"#);
}

#[test]
fn insert_with_prop_and_cast() {
    let cs = ColumnSet::new([
        ColumnInput::from("id"),
        ColumnConfig::new("payload")
            .prop("data")
            .modifier(":json")
            .cast("jsonb")
            .into(),
    ])
    .unwrap();
    let data = Value::from(
        Object::new()
            .with("id", 7)
            .with("data", Object::new().with("k", "v")),
    );
    let sql = insert(&data, &cs, "events").unwrap();
    assert_eq!(
        sql,
        r#"insert into "events"("id","payload") values(7,'{"k":"v"}'::jsonb)"#
    );
}

// ==================== update ====================

#[test]
fn update_single_row_skips_conditional() {
    let data = Value::from(id_val(1, 2));
    let sql = update(&data, &["?id", "val"], "t", &UpdateOptions::default()).unwrap();
    assert_eq!(sql, r#"update "t" set "val"=2"#);
}

#[test]
fn update_many_rows() {
    let data = rows(vec![id_val(1, 2), id_val(3, 4)]);
    let sql = update(&data, &["?id", "val"], "t", &UpdateOptions::default()).unwrap();
    assert_eq!(
        sql,
        r#"update "t" as t set "val"=v."val" from (values(1,2),(3,4)) as v("id","val")"#
    );
}

#[test]
fn update_many_rows_cap_sql_and_aliases() {
    let data = rows(vec![id_val(1, 2)]);
    let options = UpdateOptions::new().table_alias("Target").value_alias("src");
    let sql = StatementBuilder::new()
        .cap_sql(true)
        .update(&data, &["?id", "val"], "t", &options)
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "t" AS "Target" SET "val"=src."val" FROM (VALUES(1,2)) AS src("id","val")"#
    );
}

#[test]
fn update_nothing_to_update() {
    let data = Value::from(id_val(1, 2));
    let err = update(&data, &["?id"], "t", &UpdateOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot generate an UPDATE without any columns.");

    let options = UpdateOptions::new().empty_update("select 1");
    assert_eq!(update(&data, &["?id"], "t", &options).unwrap(), "select 1");

    let many = rows(vec![id_val(1, 2)]);
    assert_eq!(update(&many, &["?id"], "t", &options).unwrap(), "select 1");
}

#[test]
fn update_skip_predicate_uses_row() {
    let cs = ColumnSet::new([
        ColumnInput::from("?id"),
        ColumnInput::from("name"),
        ColumnConfig::new("val").skip(|d| !d.exists).into(),
    ])
    .unwrap();

    let partial = Value::from(Object::new().with("id", 1).with("name", "n"));
    let sql = update(&partial, &cs, "t", &UpdateOptions::default()).unwrap();
    assert_eq!(sql, r#"update "t" set "name"='n'"#);

    let full = Value::from(id_val(1, 5).with("name", "n"));
    let sql = update(&full, &cs, "t", &UpdateOptions::default()).unwrap();
    assert_eq!(sql, r#"update "t" set "name"='n',"val"=5"#);
}

#[test]
fn update_errors() {
    let options = UpdateOptions::default();
    let err = update(&Value::from(Vec::<Value>::new()), &["a"], "t", &options).unwrap_err();
    assert_eq!(
        err,
        FormatError::type_error("Cannot generate an UPDATE from an empty array.")
    );

    let many = rows(vec![id_val(1, 2)]);
    let err = update(&many, Columns::Infer, "t", &options).unwrap_err();
    assert!(err.to_string().contains("updating multiple records"));

    let err = update(&many, &["val"], None::<&str>, &options).unwrap_err();
    assert_eq!(err, FormatError::UnknownTable);

    let bad = Value::from(vec![Value::from(id_val(1, 2)), Value::Null]);
    let err = update(&bad, &["val"], "t", &options).unwrap_err();
    assert_eq!(err, FormatError::InvalidRow { kind: "update ", index: 1 });
}

// ==================== values / sets ====================

#[test]
fn values_single_and_many() {
    let one = Value::from(row(1, "x"));
    assert_eq!(values(&one, Columns::Infer).unwrap(), "(1,'x')");

    let many = rows(vec![row(1, "x"), row(2, "y")]);
    assert_eq!(values(&many, &["a", "b"]).unwrap(), "(1,'x'),(2,'y')");
    assert_eq!(values(&many, &["b"]).unwrap(), "('x'),('y')");
}

#[test]
fn values_errors() {
    let many = rows(vec![row(1, "x")]);
    let err = values(&many, Columns::Infer).unwrap_err();
    assert!(err.to_string().contains("generating multi-row values"));

    let err = values(&Value::from(Object::new()), Columns::Infer).unwrap_err();
    assert_eq!(err.to_string(), "Cannot generate values without any columns.");

    let bad = Value::from(vec![Value::from("nope")]);
    let err = values(&bad, &["a"]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid object at index 0.");

    assert_eq!(values(&Value::from(Vec::<Value>::new()), &["a"]).unwrap(), "");
}

#[test]
fn sets_formats_assignments() {
    let data = Value::from(row(1, "x"));
    assert_eq!(sets(&data, Columns::Infer).unwrap(), r#""a"=1,"b"='x'"#);
    assert_eq!(sets(&data, &["?a", "b"]).unwrap(), r#""b"='x'"#);

    let err = sets(&rows(vec![row(1, "x")]), &["a"]).unwrap_err();
    assert!(err.is_type());
}

// ==================== concat ====================

#[test]
fn concat_cleans_and_joins() {
    let five = Value::from(5);
    let sql = concat([
        QueryPart::from("  select 1; "),
        QueryPart::from(""),
        QueryPart::from(";; \n"),
        QueryPart::template("select $1;", &five),
        QueryPart::from(String::from("select 3")),
    ])
    .unwrap();
    assert_eq!(sql, "select 1;select 5;select 3");
}

#[test]
fn concat_template_inherits_cap_sql() {
    let arr = Value::from(vec![Value::from(vec![1])]);
    let builder = StatementBuilder::new().cap_sql(true);

    let sql = builder
        .concat([QueryPart::template("select $1", &arr)])
        .unwrap();
    assert_eq!(sql, "select ARRAY[1]");

    let partial = FormatOptions::new().partial(true);
    let sql = builder
        .concat([QueryPart::template("select $1, $2", &arr).with_options(partial)])
        .unwrap();
    assert_eq!(sql, "select ARRAY[1], $2");

    let lower = FormatOptions::new().cap_sql(false);
    let sql = builder
        .concat([QueryPart::template("select $1", &arr).with_options(lower)])
        .unwrap();
    assert_eq!(sql, "select array[1]");

    let upper = FormatOptions::new().cap_sql(true);
    let sql = StatementBuilder::new()
        .concat([QueryPart::template("select $1", &arr).with_options(upper)])
        .unwrap();
    assert_eq!(sql, "select ARRAY[1]");
}

#[test]
fn concat_propagates_format_errors() {
    let empty = Value::from(Vec::<Value>::new());
    let err = concat([QueryPart::template("select $1", &empty)]).unwrap_err();
    assert!(err.is_range());
}

#[cfg(feature = "tracing")]
#[test]
fn truncate_respects_char_boundaries() {
    assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    assert_eq!(truncate_sql_bytes("abcdef", 3), "abc");
    assert_eq!(truncate_sql_bytes("aé", 2), "a");
}
