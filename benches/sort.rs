//! Tree sort compared to the standard library and a plain counting sort.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use radix_tree_sort::{sort_with, Capacity, SortEngine};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

fn shuffled(n: u32) -> Vec<u32> {
    let mut values: Vec<u32> = (1..n).collect();
    values.shuffle(&mut StdRng::seed_from_u64(42));
    values
}

fn counting_sort(values: &mut [u32]) {
    let max = values.iter().copied().max().unwrap_or(0) as usize;
    let mut counts = vec![0usize; max + 1];
    for &v in values.iter() {
        counts[v as usize] += 1;
    }

    let mut idx = 0;
    for (value, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            values[idx] = value as u32;
            idx += 1;
        }
    }
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [10_000u32, 100_000, 1_000_000] {
        let input = shuffled(size);

        let mut engine = SortEngine::new();
        engine.initialize(u64::from(size), 128).unwrap();

        group.bench_with_input(BenchmarkId::new("tree_prebuilt", size), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut values| {
                    engine.sort_in_place(&mut values).unwrap();
                    black_box(values)
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("tree_one_shot", size), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut values| {
                    sort_with(&mut values, 128, Capacity::FromData).unwrap();
                    black_box(values)
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("sort_unstable", size), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut values| {
                    values.sort_unstable();
                    black_box(values)
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("counting_sort", size), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut values| {
                    counting_sort(&mut values);
                    black_box(values)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
