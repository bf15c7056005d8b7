// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver registry and capability probing
//!
//! The registry maps driver names to driver descriptors. It is shared by every
//! store created from it and is only written by registration calls; a second
//! registration under the same name replaces the first.

use super::factory::create_default_drivers;
use super::traits::Driver;
use super::types::DriverPreference;
use crate::error::{ForageError, ForageResult};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Process-wide mapping from driver name to driver
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
    /// Priority order used when a store states no preference
    default_order: RwLock<Vec<String>>,
}

impl DriverRegistry {
    /// Create an empty registry with an empty default order
    pub fn new() -> Self {
        Self {
            drivers: RwLock::new(HashMap::new()),
            default_order: RwLock::new(Vec::new()),
        }
    }

    /// Create a registry holding the built-in drivers
    ///
    /// The default order is the built-in order, best first.
    pub fn with_default_drivers(data_dir: Option<PathBuf>) -> Self {
        let registry = Self::new();
        let mut order = Vec::new();
        for driver in create_default_drivers(data_dir) {
            order.push(driver.name().to_string());
            registry.insert(driver);
        }
        debug!("Default driver order: {:?}", order);
        *registry.default_order.write() = order;
        registry
    }

    /// Store a driver under its name, replacing any previous entry
    fn insert(&self, driver: Arc<dyn Driver>) {
        let name = driver.name().to_string();
        if self.drivers.write().insert(name.clone(), driver).is_some() {
            debug!("Replaced driver '{}'", name);
        }
    }

    /// Register a driver
    ///
    /// The driver's `prepare` hook is awaited before the entry becomes
    /// visible; a failing hook leaves the registry untouched.
    pub async fn define(&self, driver: Arc<dyn Driver>) -> ForageResult<()> {
        let name = driver.name().to_string();
        if name.trim().is_empty() {
            return Err(ForageError::DriverNotCompliant(
                "driver name must not be empty".to_string(),
            ));
        }

        driver.prepare().await?;
        self.insert(driver);
        info!("Registered driver '{}'", name);
        Ok(())
    }

    /// Get a registered driver by name, supported or not
    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.read().get(name).cloned()
    }

    /// Look up a registered and supported driver
    ///
    /// Unknown and unsupported names resolve to `DriverNotFound`.
    pub async fn lookup(&self, name: &str) -> ForageResult<Arc<dyn Driver>> {
        match self.get(name) {
            Some(driver) if driver.is_supported() => Ok(driver),
            _ => Err(ForageError::DriverNotFound),
        }
    }

    /// Whether `name` is registered and usable in this environment
    pub fn supports(&self, name: &str) -> bool {
        self.get(name).map_or(false, |driver| driver.is_supported())
    }

    /// Names of every registered driver, sorted
    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_order(&self) -> Vec<String> {
        self.default_order.read().clone()
    }

    /// Replace the priority order used for stores without a preference
    pub fn set_default_order(&self, order: Vec<String>) {
        *self.default_order.write() = order;
    }

    /// Supported candidates for a preference, in preference order
    ///
    /// Duplicates, unknown and unsupported names are dropped silently.
    /// Returns `None` for an unrecognized preference.
    pub fn supported_candidates(&self, preference: &DriverPreference) -> Option<Vec<String>> {
        let names = preference.candidates(&self.default_order())?;
        let mut seen = HashSet::new();
        Some(
            names
                .into_iter()
                .filter(|name| seen.insert(name.clone()))
                .filter(|name| self.supports(name))
                .collect(),
        )
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.driver_names())
            .field("default_order", &self.default_order())
            .finish()
    }
}
