// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store instance and operation dispatch
//!
//! A [`Forage`] is one named store: configuration, a readiness gate, and the
//! driver binding the gate settles to. Every data operation waits on the
//! gate and then forwards to the bound driver's handle. Operations that have
//! already passed the gate keep the binding they saw, even if `set_driver`
//! installs a new one while they run.

use crate::config::StoreConfig;
use crate::driver::{DbInfo, Driver, DriverPreference, DriverRegistry, DropTarget};
use crate::error::{ForageError, ForageResult};
use crate::gate::ReadinessGate;
use crate::resolver::Binding;
use crate::serializer::{FramedSerializer, Serializer};
use crate::value::Value;
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Names accepted by [`Forage::drop_instance`]
///
/// Missing names default to the instance's own. A database name without a
/// store name drops the whole database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOptions {
    pub name: Option<String>,
    pub store_name: Option<String>,
}

impl DropOptions {
    /// Drop this instance's own store
    pub fn own_store() -> Self {
        Self::default()
    }

    /// Drop every store of `name`
    pub fn database(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            store_name: None,
        }
    }

    /// Drop one store of one database
    pub fn store(name: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            store_name: Some(store_name.into()),
        }
    }
}

struct InstanceState {
    /// Normalized when valid; kept as given otherwise
    config: StoreConfig,
    gate: Arc<ReadinessGate>,
    /// Set once the gate has been awaited; configuration is frozen after
    used: bool,
}

/// A named key-value store bound to one driver
pub struct Forage {
    id: Uuid,
    registry: Arc<DriverRegistry>,
    serializer: Arc<dyn Serializer>,
    state: RwLock<InstanceState>,
}

impl Forage {
    /// Create a store over `registry`
    ///
    /// Nothing is resolved yet; the first `ready()` or data operation starts
    /// driver resolution. An invalid configuration is reported by that first
    /// wait, not here.
    pub fn new(registry: Arc<DriverRegistry>, config: StoreConfig) -> Self {
        Self::with_serializer(registry, config, Arc::new(FramedSerializer::new()))
    }

    /// Create a store that encodes values with `serializer`
    pub fn with_serializer(
        registry: Arc<DriverRegistry>,
        config: StoreConfig,
        serializer: Arc<dyn Serializer>,
    ) -> Self {
        let id = Uuid::new_v4();
        let state = Self::initial_state(&registry, &serializer, config);
        debug!(
            "Created store {} ({}/{})",
            id, state.config.name, state.config.store_name
        );
        Self {
            id,
            registry,
            serializer,
            state: RwLock::new(state),
        }
    }

    /// Create a store over a fresh registry holding the built-in drivers
    pub fn with_data_dir(data_dir: impl Into<PathBuf>, config: StoreConfig) -> Self {
        let registry = DriverRegistry::with_default_drivers(Some(data_dir.into()));
        Self::new(Arc::new(registry), config)
    }

    /// Create an independent store sharing this one's registry and serializer
    pub fn create_instance(&self, config: StoreConfig) -> Forage {
        Self::with_serializer(self.registry.clone(), config, self.serializer.clone())
    }

    fn initial_state(
        registry: &Arc<DriverRegistry>,
        serializer: &Arc<dyn Serializer>,
        config: StoreConfig,
    ) -> InstanceState {
        let normalized = config.clone().normalized();
        let preference = config.driver_preference();
        let (config, info) = match normalized {
            Ok(config) => {
                let info = db_info(&config, serializer);
                (config, Ok(info))
            }
            Err(e) => {
                warn!("Invalid store configuration, store will not become ready: {}", e);
                (config, Err(e))
            }
        };
        InstanceState {
            config,
            gate: Arc::new(ReadinessGate::new(registry.clone(), preference, info)),
            used: false,
        }
    }

    /// Unique id of this instance, used in log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn registry(&self) -> &Arc<DriverRegistry> {
        &self.registry
    }

    /// Replace the configuration before first use
    ///
    /// Fails with `ConfigLocked` once the store has been used and with
    /// `InvalidConfig` when the new configuration does not validate; in both
    /// cases the current configuration is kept.
    pub fn config(&self, config: StoreConfig) -> ForageResult<()> {
        let mut state = self.state.write();
        if state.used {
            return Err(ForageError::ConfigLocked);
        }

        let config = config.normalized()?;
        let info = db_info(&config, &self.serializer);
        state.gate = Arc::new(ReadinessGate::new(
            self.registry.clone(),
            config.driver_preference(),
            Ok(info),
        ));
        state.config = config;
        debug!("Store {} reconfigured", self.id);
        Ok(())
    }

    /// Snapshot of the current configuration
    pub fn current_config(&self) -> StoreConfig {
        self.state.read().config.clone()
    }

    /// Name of the bound driver, `None` until the store is ready
    ///
    /// # Behavior
    ///
    /// Driver resolution starts on the first `ready()` or data operation,
    /// not at construction. A store that has never been used reports `None`
    /// here; await `ready()` first to learn which driver it binds.
    pub fn driver(&self) -> Option<String> {
        self.state
            .read()
            .gate
            .binding()
            .map(|binding| binding.driver_name().to_string())
    }

    /// Whether `name` is registered and usable here
    pub fn supports(&self, name: &str) -> bool {
        self.registry.supports(name)
    }

    /// Wait until a driver is bound
    ///
    /// Idempotent: every call observes the same settled outcome until
    /// `set_driver` installs a new binding.
    pub async fn ready(&self) -> ForageResult<()> {
        self.bound().await.map(|_| ())
    }

    /// Resolve a new driver preference and bind to it
    ///
    /// On success the new binding replaces the old one for every operation
    /// that has not yet passed the gate. On failure the previous binding (or
    /// previous failure) stays in force and only this call sees the error.
    pub async fn set_driver(&self, preference: impl Into<DriverPreference>) -> ForageResult<()> {
        let preference = preference.into();
        let config = self.current_config().normalized()?;
        let gate = Arc::new(ReadinessGate::new(
            self.registry.clone(),
            preference.clone(),
            Ok(db_info(&config, &self.serializer)),
        ));

        match gate.wait().await {
            Ok(binding) => {
                let mut state = self.state.write();
                state.config.driver = Some(preference);
                state.gate = gate;
                state.used = true;
                info!("Store {} switched to driver '{}'", self.id, binding.driver_name());
                Ok(())
            }
            Err(e) => {
                warn!("Store {} could not switch to {}: {}", self.id, preference, e);
                Err(e)
            }
        }
    }

    /// Look up a registered, supported driver
    pub async fn get_driver(&self, name: &str) -> ForageResult<Arc<dyn Driver>> {
        self.registry.lookup(name).await
    }

    /// Register a driver in this store's registry
    pub async fn define_driver(&self, driver: Arc<dyn Driver>) -> ForageResult<()> {
        self.registry.define(driver).await
    }

    /// The serializer values are encoded with
    pub async fn get_serializer(&self) -> ForageResult<Arc<dyn Serializer>> {
        Ok(self.serializer.clone())
    }

    /// Current gate, marking the store as used
    fn current_gate(&self) -> Arc<ReadinessGate> {
        let mut state = self.state.write();
        state.used = true;
        state.gate.clone()
    }

    async fn bound(&self) -> ForageResult<Arc<Binding>> {
        let gate = self.current_gate();
        gate.wait().await.map_err(|e| {
            debug!(
                "Store {} not ready (preference {}): {}",
                self.id,
                gate.preference(),
                e
            );
            e
        })
    }

    pub async fn get_item(&self, key: &str) -> ForageResult<Option<Value>> {
        let binding = self.bound().await?;
        binding.handle().get_item(key).await
    }

    /// Store a value under `key`, returning the value as stored
    pub async fn set_item(&self, key: &str, value: impl Into<Value>) -> ForageResult<Value> {
        let value = value.into();
        let binding = self.bound().await?;
        binding.handle().set_item(key, value).await
    }

    pub async fn remove_item(&self, key: &str) -> ForageResult<()> {
        let binding = self.bound().await?;
        binding.handle().remove_item(key).await
    }

    /// Remove every key of this store; other stores are untouched
    pub async fn clear(&self) -> ForageResult<()> {
        let binding = self.bound().await?;
        binding.handle().clear().await
    }

    pub async fn length(&self) -> ForageResult<usize> {
        let binding = self.bound().await?;
        binding.handle().length().await
    }

    /// Key at `index`, `None` when out of range
    pub async fn key(&self, index: usize) -> ForageResult<Option<String>> {
        let binding = self.bound().await?;
        binding.handle().key(index).await
    }

    pub async fn keys(&self) -> ForageResult<Vec<String>> {
        let binding = self.bound().await?;
        binding.handle().keys().await
    }

    /// Visit every entry of this store
    ///
    /// The visitor receives `(value, key, iteration_number)` with iteration
    /// numbers starting at 1. Returning `Some` stops the scan and that value
    /// becomes the result; a complete scan yields `None`.
    pub async fn iterate<T, F>(&self, mut visitor: F) -> ForageResult<Option<T>>
    where
        F: FnMut(Value, String, u32) -> Option<T> + Send,
        T: Send,
    {
        let binding = self.bound().await?;
        let mut found = None;
        binding
            .handle()
            .iterate(&mut |value, key, iteration| match visitor(value, key, iteration) {
                Some(result) => {
                    found = Some(result);
                    ControlFlow::Break(())
                }
                None => ControlFlow::Continue(()),
            })
            .await?;
        Ok(found)
    }

    /// Drop a store or a whole database through the bound driver
    pub async fn drop_instance(&self, options: DropOptions) -> ForageResult<()> {
        let current = self.current_config();
        let target = match (options.name, options.store_name) {
            (Some(name), None) => DropTarget::Database(name),
            (name, store_name) => DropTarget::Store {
                name: name.unwrap_or(current.name),
                store_name: store_name.unwrap_or(current.store_name),
            },
        };
        let target = validate_target(target)?;

        let binding = self.bound().await?;
        info!(
            "Store {} dropping {:?} via '{}'",
            self.id,
            target,
            binding.driver_name()
        );
        binding.driver().drop_instance(&target).await
    }
}

impl std::fmt::Debug for Forage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Forage")
            .field("id", &self.id)
            .field("name", &state.config.name)
            .field("store_name", &state.config.store_name)
            .field("driver", &state.gate.binding().map(|b| b.driver_name().to_string()))
            .finish()
    }
}

fn db_info(config: &StoreConfig, serializer: &Arc<dyn Serializer>) -> DbInfo {
    DbInfo {
        name: config.name.clone(),
        store_name: config.store_name.clone(),
        version: config.version,
        size: config.size,
        description: config.description.clone(),
        serializer: serializer.clone(),
    }
}

/// Apply the same name rules as store configuration to drop targets
fn validate_target(target: DropTarget) -> ForageResult<DropTarget> {
    match target {
        DropTarget::Database(name) => {
            let config = StoreConfig::new().name(name).normalized()?;
            Ok(DropTarget::Database(config.name))
        }
        DropTarget::Store { name, store_name } => {
            let config = StoreConfig::new()
                .name(name)
                .store_name(store_name)
                .normalized()?;
            Ok(DropTarget::Store {
                name: config.name,
                store_name: config.store_name,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MEMORY_DRIVER;

    fn memory_store(config: StoreConfig) -> Forage {
        Forage::new(Arc::new(DriverRegistry::with_default_drivers(None)), config)
    }

    #[tokio::test]
    async fn test_config_is_locked_after_first_use() {
        let store = memory_store(StoreConfig::new());
        store.config(StoreConfig::new().name("renamed")).unwrap();
        assert_eq!(store.current_config().name, "renamed");

        store.ready().await.unwrap();
        let err = store.config(StoreConfig::new().name("late")).unwrap_err();
        assert_eq!(err, ForageError::ConfigLocked);
        assert_eq!(store.current_config().name, "renamed");
    }

    #[tokio::test]
    async fn test_driver_is_none_until_ready() {
        let store = memory_store(StoreConfig::new());
        assert_eq!(store.driver(), None);
        // Configuration and introspection do not start resolution
        assert!(store.supports(MEMORY_DRIVER));
        let _ = store.current_config();
        assert_eq!(store.driver(), None);
        store.ready().await.unwrap();
        assert_eq!(store.driver().as_deref(), Some(MEMORY_DRIVER));
    }

    #[tokio::test]
    async fn test_invalid_config_rejects_operations() {
        let store = memory_store(StoreConfig::new().version(-1.0));
        let err = store.get_item("k").await.unwrap_err();
        assert!(matches!(err, ForageError::InvalidConfig(_)));
        assert!(store.ready().await.is_err());
    }

    #[tokio::test]
    async fn test_iterate_result_comes_from_visitor() {
        let store = memory_store(StoreConfig::new());
        store.set_item("a", 1).await.unwrap();
        store.set_item("b", 2).await.unwrap();

        let found = store
            .iterate(|value, key, n| (n == 2).then(|| (key, value)))
            .await
            .unwrap();
        assert_eq!(found, Some(("b".to_string(), Value::Int(2))));

        let none: Option<()> = store.iterate(|_, _, _| None).await.unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_drop_target_names_are_validated() {
        let target = validate_target(DropTarget::Store {
            name: "db".to_string(),
            store_name: "a-b".to_string(),
        })
        .unwrap();
        assert_eq!(
            target,
            DropTarget::Store {
                name: "db".to_string(),
                store_name: "a_b".to_string()
            }
        );
        assert!(validate_target(DropTarget::Database(String::new())).is_err());
    }
}
