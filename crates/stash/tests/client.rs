// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `Client` over an in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use stash::{BincodeCodec, Client, Codec, Error, JsonCodec, codec::Direction};
use stash_store::testing::{MockStore, StoreOp};

static_assertions::assert_impl_all!(Client<MockStore>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Client<Arc<MockStore>, JsonCodec>: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    items: Vec<String>,
    notes: Option<String>,
    totals: BTreeMap<String, i64>,
}

fn order(id: u64) -> Order {
    Order {
        id,
        items: vec!["tea".to_string(), "scone".to_string()],
        notes: None,
        totals: BTreeMap::from([("EUR".to_string(), 750)]),
    }
}

/// A value every codec refuses to encode.
struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(<S::Error as serde::ser::Error>::custom("refusing to serialize"))
    }
}

fn client(prefix: &str) -> (Client<MockStore>, MockStore) {
    let store = MockStore::new();
    (Client::with_store(store.clone(), prefix), store)
}

#[test]
fn key_with_prefix_is_prefix_dot_key() {
    let (client, _) = client("orders");
    assert_eq!(client.key("42"), "orders.42");
    assert_eq!(client.key(""), "orders.");
}

#[test]
fn key_without_prefix_is_unchanged() {
    let (client, _) = client("");
    assert_eq!(client.key("42"), "42");
    assert_eq!(client.prefix(), "");
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let (client, store) = client("orders");

    client.set("42", &order(42), Duration::from_secs(60)).await.unwrap();
    let value: Order = client.get("42").await.unwrap();

    assert_eq!(value, order(42));
    assert!(store.contains_key("orders.42"));
    assert_eq!(store.operations()[1], StoreOp::Get("orders.42".to_string()));
}

#[tokio::test]
async fn round_trips_with_json_codec() {
    let store = MockStore::new();
    let client = Client::with_store(store.clone(), "orders").with_codec(JsonCodec);

    client.set("7", &order(7), Duration::ZERO).await.unwrap();

    assert_eq!(client.get::<Order>("7").await.unwrap(), order(7));
    let raw = store.raw("orders.7").unwrap();
    assert_eq!(JsonCodec.decode::<Order>(&raw).unwrap(), order(7));
}

#[tokio::test]
async fn stored_bytes_are_codec_output() {
    let (client, store) = client("");

    client.set("k", "value", Duration::ZERO).await.unwrap();

    assert_eq!(store.raw("k"), Some(BincodeCodec.encode("value").unwrap()));
}

#[tokio::test]
async fn get_missing_key_is_not_found() {
    let (client, _) = client("orders");

    let error = client.get::<Order>("missing").await.unwrap_err();

    assert!(error.is_not_found());
    assert!(matches!(error, Error::NotFound));
}

#[tokio::test]
async fn get_into_fills_destination() {
    let (client, _) = client("orders");
    client.set("1", &order(1), Duration::ZERO).await.unwrap();

    let mut destination = order(0);
    client.get_into("1", &mut destination).await.unwrap();

    assert_eq!(destination, order(1));
}

#[tokio::test]
async fn get_into_miss_leaves_destination_untouched() {
    let (client, _) = client("orders");

    let mut destination = order(9);
    let error = client.get_into("missing", &mut destination).await.unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(destination, order(9));
}

#[tokio::test]
async fn decode_failure_is_codec_error_and_leaves_destination_untouched() {
    let store = MockStore::with_data([("orders.bad", vec![0xff])]);
    let client = Client::with_store(store, "orders");

    let mut destination = order(3);
    let error = client.get_into("bad", &mut destination).await.unwrap_err();

    match error {
        Error::Codec(codec) => assert_eq!(codec.direction(), Direction::Decode),
        other => panic!("expected a codec error, got {other:?}"),
    }
    assert_eq!(destination, order(3));
}

#[tokio::test]
async fn delete_removes_value() {
    let (client, store) = client("orders");
    client.set("5", &order(5), Duration::ZERO).await.unwrap();

    client.delete("5").await.unwrap();

    assert!(client.get::<Order>("5").await.unwrap_err().is_not_found());
    assert!(!store.contains_key("orders.5"));
}

#[tokio::test]
async fn delete_missing_key_succeeds() {
    let (client, store) = client("orders");

    client.delete("never-set").await.unwrap();

    assert_eq!(store.operations(), vec![StoreOp::Delete("orders.never-set".to_string())]);
}

#[tokio::test]
async fn set_replaces_existing_value() {
    let (client, _) = client("orders");

    client.set("1", &order(1), Duration::ZERO).await.unwrap();
    client.set("1", &order(2), Duration::ZERO).await.unwrap();

    assert_eq!(client.get::<Order>("1").await.unwrap(), order(2));
}

#[tokio::test]
async fn set_if_absent_writes_only_once() {
    let (client, _) = client("locks");

    assert!(client.set_if_absent("job", "worker-1", Duration::ZERO).await.unwrap());
    assert!(!client.set_if_absent("job", "worker-2", Duration::ZERO).await.unwrap());

    assert_eq!(client.get::<String>("job").await.unwrap(), "worker-1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_set_if_absent_has_exactly_one_winner() {
    let client = Arc::new(Client::with_store(MockStore::new(), "locks"));

    let tasks: Vec<_> = (0..16_u32)
        .map(|worker| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let won = client.set_if_absent("job", &worker, Duration::ZERO).await.unwrap();
                (worker, won)
            })
        })
        .collect();

    let mut winners = Vec::new();
    for task in tasks {
        let (worker, won) = task.await.unwrap();
        if won {
            winners.push(worker);
        }
    }

    assert_eq!(winners.len(), 1, "exactly one writer should win, got {winners:?}");
    assert_eq!(client.get::<u32>("job").await.unwrap(), winners[0]);
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let (client, _) = client("sessions");

    client.set("s1", &order(1), Duration::from_millis(300)).await.unwrap();
    assert_eq!(client.get::<Order>("s1").await.unwrap(), order(1));

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(client.get::<Order>("s1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn set_if_absent_succeeds_after_expiry() {
    let (client, _) = client("locks");

    assert!(client.set_if_absent("job", "first", Duration::from_millis(20)).await.unwrap());
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert!(client.set_if_absent("job", "second", Duration::ZERO).await.unwrap());
    assert_eq!(client.get::<String>("job").await.unwrap(), "second");
}

#[tokio::test]
async fn longest_ttl_keeps_value() {
    let (client, _) = client("sessions");

    client.set("s1", &order(1), Duration::MAX).await.unwrap();
    assert!(!client.set_if_absent("s1", &order(2), Duration::MAX).await.unwrap());

    assert_eq!(client.get::<Order>("s1").await.unwrap(), order(1));
}

#[tokio::test]
async fn encode_failure_never_reaches_store() {
    let (client, store) = client("orders");

    let set_error = client.set("x", &Unencodable, Duration::ZERO).await.unwrap_err();
    let set_if_absent_error = client.set_if_absent("x", &Unencodable, Duration::ZERO).await.unwrap_err();

    for error in [set_error, set_if_absent_error] {
        match error {
            Error::Codec(codec) => {
                assert_eq!(codec.direction(), Direction::Encode);
                assert!(codec.to_string().contains("refusing to serialize"));
            }
            other => panic!("expected a codec error, got {other:?}"),
        }
    }
    assert_eq!(store.operation_count(), 0);
}

#[tokio::test]
async fn store_errors_pass_through_unchanged() {
    let (client, store) = client("orders");
    store.fail_when(|op| matches!(op, StoreOp::Get(_)));

    let error = client.get::<Order>("1").await.unwrap_err();

    match error {
        Error::Store(store_error) => assert_eq!(store_error.to_string(), "mock: get failed"),
        other => panic!("expected a store error, got {other:?}"),
    }
}

#[tokio::test]
async fn store_failures_are_not_retried() {
    let (client, store) = client("orders");
    store.fail_when(|_| true);

    client.set("1", &order(1), Duration::ZERO).await.unwrap_err();
    client.set_if_absent("1", &order(1), Duration::ZERO).await.unwrap_err();
    client.delete("1").await.unwrap_err();

    assert_eq!(store.operation_count(), 3);
}

#[tokio::test]
async fn clients_with_different_prefixes_do_not_collide() {
    let store = MockStore::new();
    let billing = Client::with_store(store.clone(), "billing");
    let shipping = Client::with_store(store.clone(), "shipping");

    billing.set("1", "invoice", Duration::ZERO).await.unwrap();

    assert!(shipping.get::<String>("1").await.unwrap_err().is_not_found());
    assert_eq!(billing.get::<String>("1").await.unwrap(), "invoice");
}

#[cfg(feature = "redis")]
mod redis {
    use stash::{Configuration, RedisStore};

    use super::*;

    static_assertions::assert_impl_all!(Client<RedisStore>: Send, Sync);

    #[test]
    fn new_applies_configuration_without_connecting() {
        let client = Client::new(Configuration::default().with_addr("cache:6379").with_prefix("app"));

        assert_eq!(client.prefix(), "app");
        assert_eq!(client.store().addr(), Some("cache:6379"));
    }

    #[tokio::test]
    async fn bad_address_surfaces_as_store_error_on_first_use() {
        let client = Client::new(Configuration::default().with_addr("not a url://"));

        let error = client.get::<u8>("k").await.unwrap_err();

        assert!(matches!(error, Error::Store(_)));
    }
}
