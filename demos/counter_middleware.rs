//! Counter store with a validating and a clamping middleware

use canteen::{BaseStore, Middleware};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct CounterState {
    count: i64,
    step: i64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canteen=debug".into()),
        )
        .init();

    println!("=== Counter with middleware ===\n");

    let store = BaseStore::with_middlewares(
        CounterState { count: 0, step: 1 },
        vec![
            Middleware::new("no-negatives", |_: &CounterState, next: CounterState| {
                if next.count < 0 {
                    Err(format!("count {} is negative", next.count))
                } else {
                    Ok(next)
                }
            }),
            Middleware::new("clamp-100", |_: &CounterState, next: CounterState| {
                Ok(CounterState {
                    count: next.count.min(100),
                    ..next
                })
            }),
        ],
    );

    let _sub = store.subscribe(|state| {
        println!("   [commit] count = {}", state.count);
    });

    println!("Incrementing by step...");
    store
        .update(|s| CounterState {
            count: s.count + s.step,
            ..s.clone()
        })
        .unwrap();

    println!("\nPatching count to 250 (clamped by middleware)...");
    store.patch(serde_json::json!({"count": 250})).unwrap();

    println!("\nTrying to go negative (vetoed by middleware)...");
    match store.patch(serde_json::json!({"count": -5})) {
        Ok(_) => println!("   unexpected commit"),
        Err(err) => println!("   rejected: {err}"),
    }

    println!("\nFinal state: {:?}", store.get());
}
