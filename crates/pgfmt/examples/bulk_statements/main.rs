//! Example generating multi-row INSERT / UPDATE statements from plain rows.
//!
//! Run with:
//!   RUST_LOG=pgfmt.sql=debug cargo run --example bulk_statements -p pgfmt

use pgfmt::prelude::*;
use pgfmt::{ColumnInput, QueryPart, concat};
use tracing_subscriber::EnvFilter;

fn product(id: i64, sku: &str, price_cents: i64) -> Object {
    Object::new()
        .with("id", id)
        .with("sku", sku)
        .with("price_cents", price_cents)
        .with("attrs", Object::new().with("color", "red"))
}

fn main() -> FormatResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let products = ColumnSet::with_options(
        [
            ColumnInput::from("?id"),
            ColumnInput::from("sku"),
            ColumnInput::from("price_cents"),
            ColumnConfig::new("attrs")
                .modifier(":json")
                .cast("jsonb")
                .into(),
            ColumnConfig::new("updated_at")
                .init(|_| Ok(Value::from(Raw::new("now()"))))
                .into(),
        ],
        ColumnSetOptions::new().table(TableName::with_schema("shop", "products")?),
    )?;

    let rows = Value::from(vec![
        product(1, "A-1", 1250),
        product(2, "B'2", 990),
    ]);

    println!("-- insert");
    println!("{}", insert(&rows, &products, None::<&str>)?);

    println!("-- update");
    let sql = StatementBuilder::new().cap_sql(true).update(
        &rows,
        &products,
        None::<&str>,
        &UpdateOptions::default(),
    )? + " WHERE v.id = t.id";
    println!("{sql}");

    println!("-- single row");
    let one = Value::from(product(3, "C-3", 100));
    println!("{}", update(&one, &products, None::<&str>, &UpdateOptions::default())?);

    println!("-- script");
    let id = Value::from(3);
    let script = concat([
        QueryPart::from("begin;"),
        QueryPart::template("delete from shop.products where id = $1", &id),
        QueryPart::from("commit"),
    ])?;
    println!("{script}");

    Ok(())
}
