// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver
//!
//! Models a single flat key space shared by every store bound through the
//! same driver value. Stores are kept apart by prefixing physical keys with
//! the length-prefixed `"{len}:{name}/{len}:{store_name}/"`; anything outside
//! that prefix is never touched.

use super::traits::{Driver, StoreHandle, Visitor};
use super::types::{database_prefix, store_prefix, DbInfo, DropTarget, MEMORY_DRIVER};
use crate::error::ForageResult;
use crate::serializer::Serializer;
use crate::value::Value;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Flat key space backing the memory driver
#[derive(Clone, Default)]
pub struct MemoryMedium {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a physical key directly, bypassing any namespace
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.entries.write().insert(key.to_string(), bytes.to_vec());
    }

    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    /// Number of physical keys across all namespaces
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Entries whose physical key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &str) -> Vec<(String, Vec<u8>)> {
        self.entries
            .read()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn remove_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        before - entries.len()
    }
}

/// In-memory storage driver
pub struct MemoryDriver {
    name: String,
    medium: MemoryMedium,
}

impl MemoryDriver {
    /// Create the built-in memory driver
    pub fn new() -> Self {
        Self::named(MEMORY_DRIVER)
    }

    /// Create a memory driver registered under a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            medium: MemoryMedium::new(),
        }
    }

    /// Shared medium, for diagnostics and tests
    pub fn medium(&self) -> MemoryMedium {
        self.medium.clone()
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn init_storage(&self, info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        Ok(Box::new(MemoryStore {
            medium: self.medium.clone(),
            prefix: info.key_prefix(),
            serializer: info.serializer.clone(),
        }))
    }

    async fn drop_instance(&self, target: &DropTarget) -> ForageResult<()> {
        let prefix = match target {
            DropTarget::Database(name) => database_prefix(name),
            DropTarget::Store { name, store_name } => store_prefix(name, store_name),
        };
        let removed = self.medium.remove_prefix(&prefix);
        log::debug!("Dropped {} memory entries under '{}'", removed, prefix);
        Ok(())
    }
}

/// Handle onto one namespace of the memory medium
pub struct MemoryStore {
    medium: MemoryMedium,
    prefix: String,
    serializer: Arc<dyn Serializer>,
}

impl MemoryStore {
    fn physical_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn logical_key(&self, physical: &str) -> String {
        physical[self.prefix.len()..].to_string()
    }
}

#[async_trait]
impl StoreHandle for MemoryStore {
    async fn get_item(&self, key: &str) -> ForageResult<Option<Value>> {
        match self.medium.get_raw(&self.physical_key(key)) {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: Value) -> ForageResult<Value> {
        let bytes = self.serializer.serialize(&value)?;
        self.medium
            .entries
            .write()
            .insert(self.physical_key(key), bytes);
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> ForageResult<()> {
        self.medium.entries.write().remove(&self.physical_key(key));
        Ok(())
    }

    async fn clear(&self) -> ForageResult<()> {
        self.medium.remove_prefix(&self.prefix);
        Ok(())
    }

    async fn length(&self) -> ForageResult<usize> {
        Ok(self.medium.scan_prefix(&self.prefix).len())
    }

    async fn key(&self, index: usize) -> ForageResult<Option<String>> {
        Ok(self
            .medium
            .scan_prefix(&self.prefix)
            .into_iter()
            .nth(index)
            .map(|(k, _)| self.logical_key(&k)))
    }

    async fn keys(&self) -> ForageResult<Vec<String>> {
        Ok(self
            .medium
            .scan_prefix(&self.prefix)
            .into_iter()
            .map(|(k, _)| self.logical_key(&k))
            .collect())
    }

    async fn iterate(&self, visitor: &mut Visitor<'_>) -> ForageResult<()> {
        // Snapshot first so the visitor never runs under the medium lock
        let entries = self.medium.scan_prefix(&self.prefix);
        let mut iteration = 0u32;
        for (physical, bytes) in entries {
            iteration += 1;
            let value = self.serializer.deserialize(&bytes)?;
            if let ControlFlow::Break(()) = visitor(value, self.logical_key(&physical), iteration) {
                break;
            }
        }
        Ok(())
    }
}
