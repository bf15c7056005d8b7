// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver types: built-in names, driver preferences and per-binding info

use crate::serializer::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of the in-process flat key space driver
pub const MEMORY_DRIVER: &str = "memoryStorage";

/// Name of the persistent sled driver
pub const SLED_DRIVER: &str = "sledStorage";

/// Which drivers a store should try, and in what order
///
/// A preference is either the registry's default order, a single driver
/// name, or an explicit ordered list. Anything else (for example a JSON
/// object that merely looks like a list) is kept as `Unrecognized` and fails
/// resolution instead of being coerced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum DriverPreference {
    /// Use the registry's default priority order
    #[default]
    Default,
    Single(String),
    Ordered(Vec<String>),
    Unrecognized(serde_json::Value),
}

impl DriverPreference {
    /// Candidate names in preference order
    ///
    /// Returns `None` for an unrecognized preference.
    pub fn candidates(&self, default_order: &[String]) -> Option<Vec<String>> {
        match self {
            DriverPreference::Default => Some(default_order.to_vec()),
            DriverPreference::Single(name) => Some(vec![name.clone()]),
            DriverPreference::Ordered(names) => Some(names.clone()),
            DriverPreference::Unrecognized(_) => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, DriverPreference::Default)
    }
}

impl fmt::Display for DriverPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverPreference::Default => write!(f, "<default order>"),
            DriverPreference::Single(name) => write!(f, "{}", name),
            DriverPreference::Ordered(names) => write!(f, "[{}]", names.join(", ")),
            DriverPreference::Unrecognized(raw) => write!(f, "<unrecognized {}>", raw),
        }
    }
}

impl From<&str> for DriverPreference {
    fn from(name: &str) -> Self {
        DriverPreference::Single(name.to_string())
    }
}

impl From<String> for DriverPreference {
    fn from(name: String) -> Self {
        DriverPreference::Single(name)
    }
}

impl From<Vec<String>> for DriverPreference {
    fn from(names: Vec<String>) -> Self {
        DriverPreference::Ordered(names)
    }
}

impl From<Vec<&str>> for DriverPreference {
    fn from(names: Vec<&str>) -> Self {
        DriverPreference::Ordered(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for DriverPreference {
    fn from(names: &[&str]) -> Self {
        DriverPreference::Ordered(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DriverPreference {
    fn from(names: [&str; N]) -> Self {
        DriverPreference::Ordered(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<serde_json::Value> for DriverPreference {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => DriverPreference::Default,
            serde_json::Value::String(name) => DriverPreference::Single(name),
            serde_json::Value::Array(items) => DriverPreference::Ordered(
                // Entries that cannot be driver names are skipped like unknown names
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(name) => Some(name),
                        _ => None,
                    })
                    .collect(),
            ),
            other => DriverPreference::Unrecognized(other),
        }
    }
}

impl From<DriverPreference> for serde_json::Value {
    fn from(preference: DriverPreference) -> Self {
        match preference {
            DriverPreference::Default => serde_json::Value::Null,
            DriverPreference::Single(name) => serde_json::Value::String(name),
            DriverPreference::Ordered(names) => {
                serde_json::Value::Array(names.into_iter().map(serde_json::Value::String).collect())
            }
            DriverPreference::Unrecognized(raw) => raw,
        }
    }
}

/// Snapshot of a store's identity handed to `Driver::init_storage`
#[derive(Debug, Clone)]
pub struct DbInfo {
    /// Database name
    pub name: String,
    /// Namespace within the database
    pub store_name: String,
    pub version: f64,
    /// Capacity hint; drivers may ignore it
    pub size: u64,
    pub description: String,
    /// Serializer the driver must use for values
    pub serializer: Arc<dyn Serializer>,
}

impl DbInfo {
    /// Key prefix for drivers that share one flat key space
    pub fn key_prefix(&self) -> String {
        store_prefix(&self.name, &self.store_name)
    }
}

/// Flat key space prefix covering every store of database `name`
///
/// Names are length-prefixed, so no prefix can start another database's
/// or store's prefix even when names contain `/`.
pub fn database_prefix(name: &str) -> String {
    format!("{}:{}/", name.len(), name)
}

/// Flat key space prefix of one store
pub fn store_prefix(name: &str, store_name: &str) -> String {
    format!(
        "{}{}:{}/",
        database_prefix(name),
        store_name.len(),
        store_name
    )
}

/// What `drop_instance` removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Every store of the named database
    Database(String),
    /// One store of one database
    Store { name: String, store_name: String },
}

impl DropTarget {
    pub fn database(&self) -> &str {
        match self {
            DropTarget::Database(name) => name,
            DropTarget::Store { name, .. } => name,
        }
    }
}
