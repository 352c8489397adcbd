use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde::Serialize;
use std::time::Duration;

use swiftcache::{Cache, Serialized, NO_EXPIRY};

#[derive(Serialize)]
struct TestStruct {
    name: String,
    age: i32,
    city: String,
}

fn bench_scalar(c: &mut Criterion) {
    c.bench_function("set", |b| {
        let cache = Cache::new();
        b.iter(|| cache.set("name", "leoantony", NO_EXPIRY).unwrap());
    });

    c.bench_function("set_with_expiry", |b| {
        let cache = Cache::new();
        b.iter(|| cache.set("name", "leoantony", Duration::from_secs(10)).unwrap());
    });

    c.bench_function("get", |b| {
        let cache = Cache::new();
        cache.set("name", "leoantony", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.get(black_box("name"))));
    });

    c.bench_function("exists", |b| {
        let cache = Cache::new();
        cache.set("name", "leoantony", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.exists(black_box("name"))));
    });

    c.bench_function("set_del", |b| {
        let cache = Cache::new();
        b.iter(|| {
            cache.set("name", "leoantony", NO_EXPIRY).unwrap();
            black_box(cache.del("name"))
        });
    });

    c.bench_function("update", |b| {
        let cache = Cache::new();
        cache.set("name", "leoantony", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.update("name", "johndoe")));
    });

    c.bench_function("all_data", |b| {
        let cache = Cache::new();
        cache.set("key1", "value1", NO_EXPIRY).unwrap();
        cache.set("key2", "value2", NO_EXPIRY).unwrap();
        cache.set("key3", "value3", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.all_data()));
    });
}

fn bench_hash(c: &mut Criterion) {
    c.bench_function("hset", |b| {
        let cache = Cache::new();
        b.iter(|| cache.hset("user", "name", "leoantony", NO_EXPIRY).unwrap());
    });

    c.bench_function("hget", |b| {
        let cache = Cache::new();
        cache.hset("user", "name", "leoantony", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.hget(black_box("user"), black_box("name"))));
    });

    c.bench_function("hget_all", |b| {
        let cache = Cache::new();
        cache.hset("user", "name", "leoantony", NO_EXPIRY).unwrap();
        cache.hset("user", "age", 25, NO_EXPIRY).unwrap();
        cache.hset("user", "city", "New York", NO_EXPIRY).unwrap();
        b.iter(|| black_box(cache.hget_all("user")));
    });

    c.bench_function("hmset", |b| {
        let cache = Cache::new();
        let data = TestStruct {
            name: "leoantony".to_string(),
            age: 25,
            city: "New York".to_string(),
        };
        b.iter(|| cache.hmset("user", Serialized(&data), NO_EXPIRY).unwrap());
    });
}

fn bench_concurrent_get(c: &mut Criterion) {
    c.bench_function("get_concurrent_4_threads_10k", |b| {
        let cache = Cache::new();
        cache.set("name", "leoantony", NO_EXPIRY).unwrap();

        b.iter(|| {
            std::thread::scope(|s| {
                for _ in 0..4 {
                    let cache = cache.clone();
                    s.spawn(move || {
                        for _ in 0..2_500 {
                            black_box(cache.get("name"));
                        }
                    });
                }
            });
        });
    });
}

criterion_group!(benches, bench_scalar, bench_hash, bench_concurrent_get);
criterion_main!(benches);
