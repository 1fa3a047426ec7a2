/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

#![cfg_attr(feature = "fatal-warnings", deny(warnings))]
#![allow(clippy::cast_possible_wrap)]

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rbtree_map::{Natural, Reverse, TreeMap};
use std::hint::black_box;

const LIMIT: usize = 100_000;

fn shuffled_keys() -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut keys: Vec<usize> = (0..LIMIT).collect();

    keys.shuffle(&mut rng);

    keys
}

fn filled_map() -> TreeMap<usize, isize> {
    let mut map = TreeMap::new();

    for i in 0..LIMIT {
        map.insert(i, -(i as isize));
    }

    map
}

fn rbtree_map_insert(c: &mut Criterion) {
    c.bench_function("rbtree map insert", move |b| {
        b.iter(|| {
            let mut map = TreeMap::new();

            for i in 0..LIMIT {
                map.insert(i, -(i as isize));
            }

            map
        });
    });
}

fn rbtree_map_insert_shuffled(c: &mut Criterion) {
    let keys = shuffled_keys();

    c.bench_function("rbtree map insert shuffled", move |b| {
        b.iter(|| {
            let mut map = TreeMap::new();

            for &i in &keys {
                map.insert(i, -(i as isize));
            }

            map
        });
    });
}

fn rbtree_map_insert_reverse_comparator(c: &mut Criterion) {
    c.bench_function("rbtree map insert reverse comparator", move |b| {
        b.iter(|| {
            let mut map = TreeMap::with_comparator(Reverse(Natural));

            for i in 0..LIMIT {
                map.insert(i, -(i as isize));
            }

            map
        });
    });
}

fn rbtree_map_remove(c: &mut Criterion) {
    c.bench_function("rbtree map remove", move |b| {
        b.iter_with_setup(filled_map, |mut map| {
            for i in 0..LIMIT {
                map.remove(&i);
            }

            map
        });
    });
}

fn rbtree_map_erase_from_begin(c: &mut Criterion) {
    c.bench_function("rbtree map erase from begin", move |b| {
        b.iter_with_setup(filled_map, |mut map| {
            while let Ok(entry) = map.erase(map.begin()) {
                black_box(entry);
            }

            map
        });
    });
}

fn rbtree_map_get(c: &mut Criterion) {
    let map = filled_map();
    let keys = shuffled_keys();

    c.bench_function("rbtree map get", move |b| {
        b.iter(|| {
            for i in &keys {
                black_box(map.get(i));
            }
        });
    });
}

#[allow(clippy::explicit_iter_loop)]
fn rbtree_map_iterate(c: &mut Criterion) {
    let map = filled_map();

    c.bench_function("rbtree map iterate", move |b| {
        b.iter(|| {
            for kv in map.iter() {
                black_box(kv);
            }
        });
    });
}

fn rbtree_map_walk_cursor(c: &mut Criterion) {
    let map = filled_map();

    c.bench_function("rbtree map walk cursor", move |b| {
        b.iter(|| {
            let mut cursor = map.begin();

            while let Ok(next) = map.successor(cursor) {
                black_box(next);
                cursor = next;
            }
        });
    });
}

criterion_group!(
    benches,
    rbtree_map_insert,
    rbtree_map_insert_shuffled,
    rbtree_map_insert_reverse_comparator,
    rbtree_map_remove,
    rbtree_map_erase_from_begin,
    rbtree_map_get,
    rbtree_map_iterate,
    rbtree_map_walk_cursor
);
criterion_main!(benches);
