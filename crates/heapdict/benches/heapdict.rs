use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use heapdict::HeapDict;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const N: u32 = 10_000;

fn entries() -> Vec<(u32, u64)> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..N).map(|k| (k, rng.gen_range(0..1_000_000))).collect()
}

fn build(c: &mut Criterion) {
    let es = entries();
    c.bench_function("heapify 10k", |b| {
        b.iter_batched(
            || es.clone(),
            |es| HeapDict::try_from_iter(es).unwrap(),
            BatchSize::SmallInput,
        )
    });
    c.bench_function("set 10k", |b| {
        b.iter_batched(
            || es.clone(),
            |es| {
                let mut h = HeapDict::with_capacity(es.len());
                h.extend(es);
                h
            },
            BatchSize::SmallInput,
        )
    });
}

fn update_and_pop(c: &mut Criterion) {
    let h = HeapDict::try_from_iter(entries()).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    let updates: Vec<(u32, u64)> = (0..N)
        .map(|_| (rng.gen_range(0..N), rng.gen_range(0..1_000_000)))
        .collect();
    c.bench_function("decrease-key 10k", |b| {
        b.iter_batched(
            || h.clone(),
            |mut h| {
                for &(k, p) in &updates {
                    h.improve(k, p);
                }
                h
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("pop all 10k", |b| {
        b.iter_batched(
            || h.clone(),
            |mut h| {
                while let Ok(e) = h.pop() {
                    black_box(e);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, build, update_and_pop);
criterion_main!(benches);
