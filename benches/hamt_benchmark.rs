// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use arena_hamt::{static_hamt, Bytes, Hamt};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ITEM_COUNT: usize = 1000;

fn keys() -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(17);
    (0..ITEM_COUNT)
        .map(|_| Alphanumeric.sample_string(&mut rng, 12))
        .collect()
}

fn insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("HAMT bulk insert", |b| {
        b.iter(|| {
            let mut map: Hamt<&str, usize, Bytes> = Hamt::new();
            for (i, key) in keys.iter().enumerate() {
                map.set(black_box(key.as_str()), black_box(i)).unwrap();
            }
            map
        })
    });
}

fn get_hit(c: &mut Criterion) {
    let keys = keys();
    let map: Hamt<&str, usize, Bytes> =
        Hamt::from_entries(keys.iter().enumerate().map(|(i, k)| (k.as_str(), i))).unwrap();
    c.bench_function("HAMT lookup (hit)", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(black_box(key.as_str())));
            }
        })
    });
}

fn get_miss(c: &mut Criterion) {
    let keys = keys();
    let probes: Vec<String> = keys.iter().map(|k| format!("{k}-missing")).collect();
    let map: Hamt<&str, usize, Bytes> =
        Hamt::from_entries(keys.iter().enumerate().map(|(i, k)| (k.as_str(), i))).unwrap();
    c.bench_function("HAMT lookup (miss)", |b| {
        b.iter(|| {
            for probe in &probes {
                black_box(map.get(black_box(probe.as_str())));
            }
        })
    });
}

static_hamt! {
    static KEYWORDS: u32 = {
        "break" => 0,
        "const" => 1,
        "continue" => 2,
        "else" => 3,
        "enum" => 4,
        "fn" => 5,
        "for" => 6,
        "if" => 7,
        "impl" => 8,
        "let" => 9,
        "loop" => 10,
        "match" => 11,
        "return" => 12,
        "struct" => 13,
        "while" => 14,
    };
}

fn static_get(c: &mut Criterion) {
    let probes = [
        "break", "const", "continue", "else", "enum", "fn", "for", "if", "impl", "let", "loop",
        "match", "return", "struct", "while", "ident", "x", "loopy",
    ];
    c.bench_function("static HAMT lookup", |b| {
        b.iter(|| {
            for probe in probes {
                black_box(KEYWORDS.get(black_box(probe)));
            }
        })
    });
}

criterion_group!(benches, insert, get_hit, get_miss, static_get);
criterion_main!(benches);
