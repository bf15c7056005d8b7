//! Tests for the data operations, run against every built-in driver

#[path = "testutils/mod.rs"]
mod testutils;

use kvforage::{Forage, StoreConfig, Value, MEMORY_DRIVER};
use std::collections::BTreeMap;
use testutils::test_fixture::TestFixture;

#[cfg(feature = "sled-backend")]
use kvforage::SLED_DRIVER;

/// Drivers every API test runs against
fn drivers() -> Vec<&'static str> {
    let mut drivers = vec![MEMORY_DRIVER];
    #[cfg(feature = "sled-backend")]
    drivers.push(SLED_DRIVER);
    drivers
}

async fn fresh_store(fixture: &TestFixture, driver: &str) -> Forage {
    let store = fixture.store_on(driver, StoreConfig::new().name("api").store_name("items"));
    store.ready().await.unwrap();
    assert_eq!(store.driver().as_deref(), Some(driver));
    store
}

#[tokio::test]
async fn test_get_missing_key_is_none() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;
        assert_eq!(store.get_item("missing").await.unwrap(), None, "{}", driver);
    }
}

#[tokio::test]
async fn test_set_get_overwrite_remove() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;

        let stored = store.set_item("officeX", "InitechX").await.unwrap();
        assert_eq!(stored, Value::from("InitechX"));
        assert_eq!(
            store.get_item("officeX").await.unwrap(),
            Some(Value::from("InitechX"))
        );

        store.set_item("officeX", 42).await.unwrap();
        assert_eq!(store.get_item("officeX").await.unwrap(), Some(Value::Int(42)));

        store.remove_item("officeX").await.unwrap();
        assert_eq!(store.get_item("officeX").await.unwrap(), None);

        // Removing an absent key is not an error
        store.remove_item("officeX").await.unwrap();
    }
}

#[tokio::test]
async fn test_structured_values_survive_storage() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;

        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("Peter"));
        map.insert("age".to_string(), Value::Int(31));
        map.insert(
            "tags".to_string(),
            Value::List(vec![Value::Bool(true), Value::Float(2.5), Value::Null]),
        );
        let value = Value::Map(map);

        store.set_item("person", value.clone()).await.unwrap();
        store.set_item("blob", vec![0u8, 1, 2, 255]).await.unwrap();
        store.set_item("nothing", Value::Null).await.unwrap();

        assert_eq!(store.get_item("person").await.unwrap(), Some(value));
        assert_eq!(
            store.get_item("blob").await.unwrap(),
            Some(Value::Bytes(vec![0, 1, 2, 255]))
        );
        assert_eq!(store.get_item("nothing").await.unwrap(), Some(Value::Null));
    }
}

#[tokio::test]
async fn test_length_key_keys_clear() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;
        assert_eq!(store.length().await.unwrap(), 0);
        assert_eq!(store.key(0).await.unwrap(), None);

        store.set_item("b", 2).await.unwrap();
        store.set_item("a", 1).await.unwrap();
        store.set_item("c", 3).await.unwrap();

        assert_eq!(store.length().await.unwrap(), 3);
        let keys = store.keys().await.unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
        for (index, key) in keys.iter().enumerate() {
            assert_eq!(store.key(index).await.unwrap().as_ref(), Some(key));
        }
        assert_eq!(store.key(3).await.unwrap(), None);

        store.clear().await.unwrap();
        assert_eq!(store.length().await.unwrap(), 0);
        assert!(store.keys().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_iterate_visits_every_entry_with_numbers() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;
        store.set_item("officeX", "InitechX").await.unwrap();
        store.set_item("officeY", "InitechY").await.unwrap();

        let mut seen = Vec::new();
        let result: Option<()> = store
            .iterate(|value, key, n| {
                seen.push((key, value, n));
                None
            })
            .await
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(
            seen,
            vec![
                ("officeX".to_string(), Value::from("InitechX"), 1),
                ("officeY".to_string(), Value::from("InitechY"), 2),
            ]
        );
    }
}

#[tokio::test]
async fn test_iterate_stops_on_first_result() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;
        store.set_item("officeX", "InitechX").await.unwrap();
        store.set_item("officeY", "InitechY").await.unwrap();

        let mut visits = 0;
        let result = store
            .iterate(|value, _, _| {
                visits += 1;
                Some(value)
            })
            .await
            .unwrap();

        assert_eq!(result, Some(Value::from("InitechX")));
        assert_eq!(visits, 1);
    }
}

#[tokio::test]
async fn test_iterate_on_empty_store() {
    let fixture = TestFixture::new().unwrap();
    for driver in drivers() {
        let store = fresh_store(&fixture, driver).await;
        let mut visits = 0;
        let result: Option<()> = store
            .iterate(|_, _, _| {
                visits += 1;
                None
            })
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(visits, 0);
    }
}

#[cfg(feature = "sled-backend")]
#[tokio::test]
async fn test_sled_data_survives_new_registry() {
    testutils::test_fixture::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = || StoreConfig::new().name("persisted").driver(SLED_DRIVER);

    {
        let store = Forage::with_data_dir(dir.path(), config());
        store.set_item("kept", "across restarts").await.unwrap();
    }

    let store = Forage::with_data_dir(dir.path(), config());
    assert_eq!(
        store.get_item("kept").await.unwrap(),
        Some(Value::from("across restarts"))
    );
}

#[cfg(feature = "sled-backend")]
#[tokio::test]
async fn test_stores_opened_on_one_data_dir_share_sled() {
    testutils::test_fixture::init_logging();
    let dir = tempfile::tempdir().unwrap();

    let first = Forage::with_data_dir(dir.path(), StoreConfig::new().name("shared"));
    let second = Forage::with_data_dir(dir.path(), StoreConfig::new().name("shared"));
    first.ready().await.unwrap();
    second.ready().await.unwrap();
    assert_eq!(first.driver().as_deref(), Some(SLED_DRIVER));
    assert_eq!(second.driver().as_deref(), Some(SLED_DRIVER));

    second.set_item("k", "v").await.unwrap();
    assert_eq!(first.get_item("k").await.unwrap(), Some(Value::from("v")));
}
