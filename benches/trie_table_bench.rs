use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};

use keyed_tables::DigitTrieTable;

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_rand_insert");
    group.throughput(Throughput::Elements(1));
    let keys = gen_keys(2, 1, 3);

    group.bench_function("trie_table", |b| {
        let mut table = DigitTrieTable::new();
        let mut rng = thread_rng();
        b.iter(|| {
            let key = &keys[rng.gen_range(0..keys.len())];
            criterion::black_box(table.insert(key.clone(), 1u64).unwrap());
        })
    });

    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_rand_get");
    group.throughput(Throughput::Elements(1));

    for suffix in [2, 6] {
        let keys = gen_keys(2, 1, suffix);
        group.bench_with_input(BenchmarkId::new("trie_table", suffix), &suffix, |b, _| {
            let mut table = DigitTrieTable::new();
            for (i, key) in keys.iter().enumerate() {
                table.insert(key.clone(), i).unwrap();
            }
            let mut rng = thread_rng();
            b.iter(|| {
                let key = &keys[rng.gen_range(0..keys.len())];
                criterion::black_box(table.get(key).unwrap());
            })
        });
    }

    group.finish();
}

pub fn sort_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_sort_keys");
    let keys = gen_keys(1, 1, 3);
    let mut table = DigitTrieTable::new();
    for key in &keys {
        table.insert(key.clone(), ()).unwrap();
    }
    group.throughput(Throughput::Elements(table.len() as u64));
    group.bench_function("trie_table", |b| {
        b.iter(|| criterion::black_box(table.sort_keys().len()))
    });

    group.finish();
}

// Lowercase only, so every pair of distinct keys separates at some level.
fn gen_keys(l1_prefix: usize, l2_prefix: usize, suffix: usize) -> Vec<String> {
    let mut keys = Vec::new();
    let chars: Vec<char> = ('a'..='z').collect();
    for c1 in &chars {
        let level1_prefix = c1.to_string().repeat(l1_prefix);
        for c2 in &chars {
            let key_prefix = level1_prefix.clone() + &c2.to_string().repeat(l2_prefix);
            for _ in 0..16 {
                let suffix: String = (0..suffix)
                    .map(|_| chars[thread_rng().gen_range(0..chars.len())])
                    .collect();
                keys.push(key_prefix.clone() + &suffix);
            }
        }
    }

    keys.shuffle(&mut thread_rng());
    keys
}

criterion_group!(trie_benches, rand_insert, rand_get, sort_keys);
criterion_main!(trie_benches);
