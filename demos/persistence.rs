//! State that survives across runs via the local file-backed storage
//!
//! Run this a few times: the counter keeps climbing.

use canteen::{create_shared_store, PersistenceOptions, StoreOptions};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Session {
    runs: u64,
}

fn main() {
    println!("=== Persistent shared store ===\n");

    let persistence =
        PersistenceOptions::local("canteen-demo-session").expect("cannot open local storage");

    let shared = create_shared_store(
        Session { runs: 0 },
        StoreOptions::new().with_persistence(persistence),
    );

    let view = shared.view_all();
    println!("Restored state: {:?}", view.state());

    view.update(|s| Session { runs: s.runs + 1 }).unwrap();
    println!("This program has now run {} time(s).", view.state().runs);
}
