use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgfmt::{ColumnSet, Object, Value, format, insert};

/// `select $1, $2, ... $n`
fn positional_template(n: usize) -> (String, Value) {
    let query = (1..=n)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let values: Value = (0..n).map(|i| format!("value '{i}'")).collect();
    (format!("select {query}"), values)
}

/// `select ${c0}, ${c1}, ... ${cn}`
fn named_template(n: usize) -> (String, Value) {
    let query = (0..n)
        .map(|i| format!("${{c{i}}}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut row = Object::new();
    for i in 0..n {
        row.insert(format!("c{i}"), i as i64);
    }
    (format!("select {query}"), Value::from(row))
}

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("format/template");

    for n in [1, 10, 100] {
        let (query, values) = positional_template(n);
        group.bench_with_input(BenchmarkId::new("positional", n), &n, |b, _| {
            b.iter(|| black_box(format(&query, &values).unwrap()));
        });

        let (query, values) = named_template(n);
        group.bench_with_input(BenchmarkId::new("named", n), &n, |b, _| {
            b.iter(|| black_box(format(&query, &values).unwrap()));
        });
    }

    group.finish();
}

fn bench_multi_row_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("format/insert_rows");
    let cs = ColumnSet::new(["id", "name", "active", "tags:json"]).unwrap();

    for rows in [1, 100, 1000] {
        let data: Value = (0..rows)
            .map(|i| {
                Object::new()
                    .with("id", i as i64)
                    .with("name", format!("user {i}"))
                    .with("active", i % 2 == 0)
                    .with("tags", vec!["a", "b"])
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| black_box(insert(data, &cs, "users").unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_templates, bench_multi_row_insert);
criterion_main!(benches);
