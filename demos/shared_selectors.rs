//! Two consumers over one shared store, each watching its own slice

use canteen::{create_shared_store, StoreOptions};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct AppState {
    count: i64,
    user: String,
}

fn main() {
    println!("=== Shared store with selectors ===\n");

    let shared = create_shared_store(
        AppState {
            count: 0,
            user: "nobody".to_string(),
        },
        StoreOptions::new(),
    );

    // One consumer cares about the counter, the other about the user name.
    let count_view = shared.view(|s: &AppState| s.count);
    let user_view = shared.view(|s: &AppState| s.user.clone());

    let _count_sub = count_view.on_change(|count| {
        println!("   [count consumer] re-render with count = {count}");
    });
    let _user_sub = user_view.on_change(|user| {
        println!("   [user consumer] re-render with user = {user}");
    });

    println!("Updating count (only the count consumer re-renders)...");
    count_view.patch(serde_json::json!({"count": 1})).unwrap();

    println!("\nUpdating user (only the user consumer re-renders)...");
    user_view.patch(serde_json::json!({"user": "ada"})).unwrap();

    println!("\nUpdating count to the same value (nobody re-renders)...");
    count_view.patch(serde_json::json!({"count": 1})).unwrap();

    println!("\nBoth views read from the same store:");
    println!("   count view sees {}", count_view.state());
    println!("   user view sees {}", user_view.state());
}
