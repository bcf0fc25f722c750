use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlf::{PostgresBindVar, Query, join, sqlf};

/// Build `n` single-condition clauses: col0 = $1, col1 = $2, ...
fn build_conditions(n: usize) -> Vec<Query> {
    (0..n)
        .map(|i| sqlf!(&format!("col{i} = %d"), i as i64).unwrap())
        .collect()
}

fn bench_compose_and_render(c: &mut Criterion) {
    c.bench_function("compose/simple", |b| {
        b.iter(|| {
            let q = sqlf!(
                "SELECT * FROM test_table WHERE a = %s AND b = %d",
                "foo",
                1
            )
            .unwrap();
            black_box(q.to_sql(&PostgresBindVar));
        });
    });

    c.bench_function("compose/explicit_reuse", |b| {
        b.iter(|| {
            let q = sqlf!(
                "UPDATE t SET a = %[1]s, b = %[1]s WHERE c = %[1]s AND d = %s",
                "val",
                7
            )
            .unwrap();
            black_box(q.to_sql(&PostgresBindVar));
        });
    });
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose/join");

    for n in [1, 5, 10, 50, 100] {
        let conds = build_conditions(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &conds, |b, conds| {
            b.iter(|| {
                let q = join(conds, "AND");
                black_box(q.to_sql(&PostgresBindVar));
            });
        });
    }

    group.finish();
}

fn bench_nested_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose/nested");

    for depth in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut q = sqlf!("x = %d", 0).unwrap();
                for i in 1..=depth {
                    q = sqlf!("y = %d AND (%s)", i as i64, q).unwrap();
                }
                black_box(q.to_sql(&PostgresBindVar));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compose_and_render,
    bench_join,
    bench_nested_flatten
);
criterion_main!(benches);
