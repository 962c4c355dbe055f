// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Using a client against the in-memory mock store.
//!
//! Useful in tests of code that takes a `Client`: every store operation is
//! recorded, and failures can be injected.

use std::time::Duration;

use stash::{Client, Error, MockStore, StoreOp};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let store = MockStore::new();
    let client = Client::with_store(store.clone(), "demo");

    client.set("greeting", "hello", Duration::from_secs(60)).await?;
    let greeting: String = client.get("greeting").await?;
    println!("greeting = {greeting}");

    // The store only ever sees namespaced keys.
    for op in store.operations() {
        println!("store saw {} on {}", op_name(&op), op.key());
    }

    store.fail_when(|op| matches!(op, StoreOp::Delete(_)));
    match client.delete("greeting").await {
        Err(Error::Store(error)) => println!("delete failed as requested: {error}"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}

fn op_name(op: &StoreOp) -> &'static str {
    match op {
        StoreOp::Get(_) => "GET",
        StoreOp::Set { .. } => "SET",
        StoreOp::SetIfAbsent { .. } => "SET NX",
        StoreOp::Delete(_) => "DEL",
    }
}
