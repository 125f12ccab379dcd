use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use formula_frame::{Container, FrameConfig, SortSpec, Table};

fn bench_rows() -> usize {
    std::env::var("FORMULA_FRAME_BENCH_ROWS")
        .ok()
        .and_then(|v| v.replace('_', "").parse::<usize>().ok())
        .filter(|&v| v >= 1_000 && v <= 5_000_000)
        .unwrap_or(100_000)
}

fn build_table(rows: usize) -> Table {
    // Low-cardinality region key plus a higher-cardinality product key.
    let regions: Vec<String> = (0..rows).map(|i| format!("r{}", i % 16)).collect();
    let products: Vec<String> = (0..rows).map(|i| format!("p{}", (i * 7919) % 1_000)).collect();
    let amounts: Vec<f64> = (0..rows).map(|i| ((i * 31) % 997) as f64).collect();

    Table::new(vec![
        Container::new(regions).with_name("region"),
        Container::new(products).with_name("product"),
        Container::new(amounts).with_name("amount"),
    ])
    .expect("bench columns have equal length")
}

fn group_and_sort(c: &mut Criterion) {
    let rows = bench_rows();
    let table = build_table(rows);
    let config = FrameConfig::default();

    let mut group = c.benchmark_group("formula_frame");
    group.throughput(Throughput::Elements(rows as u64));

    for labels in [&["region"][..], &["region", "product"][..]] {
        group.bench_with_input(
            BenchmarkId::new("group_by_sum", labels.join("+")),
            &labels,
            |b, labels| {
                b.iter(|| {
                    let grouped = table.group_by(labels, &config).expect("group_by");
                    let amount = table.column("amount").expect("amount column");
                    black_box(grouped.sum(amount).expect("sum"))
                })
            },
        );
    }

    group.bench_function("sort_two_keys", |b| {
        b.iter(|| {
            let mut t = table.copy();
            t.sort_by(&[SortSpec::asc("region"), SortSpec::desc("amount")])
                .expect("sort");
            black_box(t.row_count())
        })
    });

    group.finish();
}

criterion_group!(benches, group_and_sort);
criterion_main!(benches);
