// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store configuration
//!
//! Every option has a default, so an empty JSON object is a valid config.

use crate::driver::DriverPreference;
use crate::error::{ForageError, ForageResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default database name
pub const DEFAULT_NAME: &str = "kvforage";

/// Default namespace within a database
pub const DEFAULT_STORE_NAME: &str = "keyvaluepairs";

/// Default capacity hint in bytes
pub const DEFAULT_SIZE: u64 = 4_980_736;

/// Options recognized when constructing a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Database name
    pub name: String,

    /// Namespace within the database
    pub store_name: String,

    /// Schema version
    pub version: f64,

    /// Capacity hint, passed through to drivers
    pub size: u64,

    pub description: String,

    /// Driver name or ordered list of driver names; `None` uses the
    /// registry's default order
    pub driver: Option<DriverPreference>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            version: 1.0,
            size: DEFAULT_SIZE,
            description: String::new(),
            driver: None,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    pub fn version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn driver(mut self, driver: impl Into<DriverPreference>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> ForageResult<Self> {
        serde_json::from_str(json).map_err(|e| ForageError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ForageResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ForageError::InvalidConfig(format!("cannot read {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Driver preference, falling back to the default order
    pub fn driver_preference(&self) -> DriverPreference {
        self.driver.clone().unwrap_or_default()
    }

    /// Validate and normalize the configuration
    ///
    /// Store names are restricted to `[A-Za-z0-9_]`; other characters are
    /// replaced with `_`.
    pub fn normalized(mut self) -> ForageResult<Self> {
        if self.name.is_empty() {
            return Err(ForageError::InvalidConfig(
                "Database name must not be empty.".to_string(),
            ));
        }
        if self.store_name.is_empty() {
            return Err(ForageError::InvalidConfig(
                "Store name must not be empty.".to_string(),
            ));
        }
        if !self.version.is_finite() || self.version <= 0.0 {
            return Err(ForageError::InvalidConfig(
                "Database version must be a number.".to_string(),
            ));
        }

        let sanitized: String = self
            .store_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if sanitized != self.store_name {
            warn!(
                "storeName '{}' contains unsupported characters, using '{}'",
                self.store_name, sanitized
            );
            self.store_name = sanitized;
        }

        Ok(self)
    }
}
