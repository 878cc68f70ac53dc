use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use canteen::{create_shared_store, BaseStore, Middleware, StoreOptions};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct State {
    counter: u64,
    name: String,
}

fn state() -> State {
    State {
        counter: 0,
        name: "bench".to_string(),
    }
}

fn store_update_benchmark(c: &mut Criterion) {
    let store = BaseStore::new(state());

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store
                .update(|s| State {
                    counter: black_box(i),
                    ..s.clone()
                })
                .unwrap();
            i += 1;
        });
    });
}

fn store_patch_benchmark(c: &mut Criterion) {
    let store = BaseStore::new(state());

    c.bench_function("store_patch", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store.patch(serde_json::json!({"counter": black_box(i)})).unwrap();
            i += 1;
        });
    });
}

fn middleware_chain_benchmark(c: &mut Criterion) {
    let store = BaseStore::with_middlewares(
        state(),
        vec![
            Middleware::new("pass-1", |_: &State, next: State| Ok(next)),
            Middleware::new("pass-2", |_: &State, next: State| Ok(next)),
            Middleware::new("pass-3", |_: &State, next: State| Ok(next)),
        ],
    );

    c.bench_function("middleware_chain", |b| {
        let mut i = 0;
        b.iter(|| {
            store
                .update(|s| State {
                    counter: black_box(i),
                    ..s.clone()
                })
                .unwrap();
            i += 1;
        });
    });
}

fn notify_fanout_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify_fanout");

    for subscriber_count in [1, 10, 100].iter() {
        let store = BaseStore::new(state());
        let mut subs = Vec::new();

        for _ in 0..*subscriber_count {
            subs.push(store.subscribe(|_| {
                // Empty subscriber
            }));
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store
                        .update(|s| State {
                            counter: black_box(i),
                            ..s.clone()
                        })
                        .unwrap();
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn selector_gating_benchmark(c: &mut Criterion) {
    let shared = create_shared_store(state(), StoreOptions::new());
    let counter_view = shared.view(|s: &State| s.counter);
    let _name_view = shared.view(|s: &State| s.name.clone());

    c.bench_function("selector_gating", |b| {
        let mut i = 0;
        b.iter(|| {
            counter_view
                .update(|s| State {
                    counter: black_box(i),
                    ..s.clone()
                })
                .unwrap();
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    store_update_benchmark,
    store_patch_benchmark,
    middleware_chain_benchmark,
    notify_fanout_benchmark,
    selector_gating_benchmark,
);
criterion_main!(benches);
