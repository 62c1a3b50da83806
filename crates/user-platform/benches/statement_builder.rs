use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use user_platform::statement::placeholder_count;
use user_platform::{RowMapper, StatementBuilder, TypeAccessors, User, Value, ValueRow};

/// `SELECT ... FROM t WHERE col0 = $1 AND col1 = $2 ...` with `n` placeholders.
fn select_template(n: usize) -> String {
    let mut sql = String::from("SELECT * FROM t WHERE ");
    for i in 0..n {
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push_str(&format!("col{i} = ${}", i + 1));
    }
    sql
}

fn mixed_args(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| match i % 3 {
            0 => Value::from(i as i64),
            1 => Value::from(format!("v{i}")),
            _ => Value::from(i % 2 == 0),
        })
        .collect()
}

fn bench_placeholder_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/placeholder_count");

    for n in [1, 5, 10, 50, 100] {
        let sql = select_template(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(placeholder_count(sql)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let accessors = TypeAccessors::standard();
    let mut group = c.benchmark_group("statement_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let sql = select_template(n);
        let args = mixed_args(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let stmt = StatementBuilder::new(&accessors)
                    .build(sql.as_str(), args.clone())
                    .unwrap();
                black_box(stmt);
            });
        });
    }

    group.finish();
}

fn bench_map_users(c: &mut Criterion) {
    let accessors = TypeAccessors::standard();
    let mut group = c.benchmark_group("row_mapper/map_all_users");

    for n in [1, 10, 100, 1000] {
        let rows: Vec<ValueRow> = (0..n)
            .map(|i| {
                ValueRow::new()
                    .with("id", i as i64)
                    .with("name", format!("user{i}"))
                    .with("password", "secret")
                    .with("email", format!("user{i}@example.com"))
                    .with("phoneNumber", "555-0100")
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| {
                let users: Vec<User> = RowMapper::new(&accessors)
                    .map_all(rows.iter().cloned())
                    .unwrap();
                black_box(users);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_placeholder_count, bench_build, bench_map_users);
criterion_main!(benches);
