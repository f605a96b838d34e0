use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rbos_tree::OrderedSet;
use std::collections::BTreeSet;

const N: usize = 10_000;

// Select and rank against BTreeSet are linear scans, so they run on fewer probes.
const PROBES: usize = 200;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert ─────────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| {
            let mut set = OrderedSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

// ─── Contains ───────────────────────────────────────────────────────────────

fn bench_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let os_set: OrderedSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| os_set.contains(k)).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| bt_set.contains(k)).count());
    });

    group.finish();
}

// ─── Remove ─────────────────────────────────────────────────────────────────

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<OrderedSet<i64>>(),
            |mut set| {
                for &k in &keys {
                    set.remove(&k);
                }
                set
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for &k in &keys {
                    set.remove(&k);
                }
                set
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Order statistics ───────────────────────────────────────────────────────

fn bench_order_of_key(c: &mut Criterion) {
    let keys = random_keys(N);
    let probes = &keys[..PROBES];
    let os_set: OrderedSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("order_of_key");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| probes.iter().map(|k| os_set.order_of_key(k)).sum::<usize>());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| probes.iter().map(|k| bt_set.range(..k).count()).sum::<usize>());
    });

    group.finish();
}

fn bench_find_by_order(c: &mut Criterion) {
    let keys = random_keys(N);
    let os_set: OrderedSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
    let ranks: Vec<usize> = (0..PROBES).map(|i| i * os_set.len() / PROBES).collect();

    let mut group = c.benchmark_group("find_by_order");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| ranks.iter().filter_map(|&r| os_set.find_by_order(r).key().copied()).sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| ranks.iter().filter_map(|&r| bt_set.iter().nth(r).copied()).sum::<i64>());
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert_ordered, bench_insert_random);

criterion_group!(lookup_benches, bench_contains_random, bench_remove_random);

criterion_group!(order_statistic_benches, bench_order_of_key, bench_find_by_order);

criterion_main!(insert_benches, lookup_benches, order_statistic_benches);
