use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;
use xstream::{of, Options};

fn bench_basic_operations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("basic_operations");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("map_filter", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = of(0..size)
                    .map(|x| black_box(x * 2), Options::default())
                    .filter(|x| black_box(x % 4 == 0), Options::default())
                    .count()
                    .await;
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("split", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = of(0..size)
                    .split(100)
                    .unwrap()
                    .map(|chunk| black_box(chunk.len()), Options::default())
                    .count()
                    .await;
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("sort_tail", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = of((0..size).rev())
                    .sort(|a, b| a < b)
                    .tail(10)
                    .to_vec()
                    .await;
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_parallel_walk(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("parallel_walk");

    for work_size in [1, 2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::new("walk_sleep", work_size),
            work_size,
            |b, &work_size| {
                b.to_async(&rt).iter(|| async move {
                    let result = of(0..64)
                        .walk(
                            |x, sink| async move {
                                tokio::time::sleep(std::time::Duration::from_micros(50)).await;
                                let _ = sink.send(x).await;
                            },
                            Options::default().with_work_size(work_size),
                        )
                        .count()
                        .await;
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_basic_operations, bench_parallel_walk);
criterion_main!(benches);
