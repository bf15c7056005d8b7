//! Tests for callback-style completion

#[path = "testutils/mod.rs"]
mod testutils;

use kvforage::{CallbackExt, ForageError, StoreConfig, Value, MEMORY_DRIVER};
use testutils::test_fixture::TestFixture;

#[tokio::test]
async fn test_callback_and_future_see_same_value() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store_on(MEMORY_DRIVER, StoreConfig::new());

    let mut from_callback = None;
    let stored = store
        .set_item("officeX", "InitechX")
        .with_callback(|result| from_callback = result.ok().cloned())
        .await
        .unwrap();
    assert_eq!(from_callback, Some(stored.clone()));

    let mut from_callback = None;
    let fetched = store
        .get_item("officeX")
        .with_callback(|result| from_callback = result.ok().cloned())
        .await
        .unwrap();
    assert_eq!(fetched, Some(Value::from("InitechX")));
    assert_eq!(from_callback, Some(fetched));
}

#[tokio::test]
async fn test_callback_receives_readiness_error() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store_on("I am not a driver", StoreConfig::new());

    let mut error = None;
    let result = store
        .keys()
        .with_callback(|result| error = result.err().cloned())
        .await;
    assert_eq!(result.unwrap_err(), ForageError::NoAvailableStorage);
    assert_eq!(error, Some(ForageError::NoAvailableStorage));
}

#[tokio::test]
async fn test_throwing_callback_still_resolves() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store_on(MEMORY_DRIVER, StoreConfig::new());
    store.set_item("key", "value").await.unwrap();

    let value = store
        .get_item("key")
        .with_callback(|_| panic!("Thrown test error"))
        .await
        .unwrap();
    assert_eq!(value, Some(Value::from("value")));

    // The store is still usable after a callback panicked
    assert_eq!(store.length().await.unwrap(), 1);
}

#[tokio::test]
async fn test_iterate_with_callback() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store_on(MEMORY_DRIVER, StoreConfig::new());
    store.set_item("a", 1).await.unwrap();
    store.set_item("b", 2).await.unwrap();

    let mut reported = None;
    let found = store
        .iterate(|value, key, _| (key == "b").then_some(value))
        .with_callback(|result| reported = result.ok().cloned())
        .await
        .unwrap();
    assert_eq!(found, Some(Value::Int(2)));
    assert_eq!(reported, Some(Some(Value::Int(2))));
}

#[tokio::test]
async fn test_ready_with_callback() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store_on(MEMORY_DRIVER, StoreConfig::new());

    let mut called = false;
    store
        .ready()
        .with_callback(|result| called = result.is_ok())
        .await
        .unwrap();
    assert!(called);
}
