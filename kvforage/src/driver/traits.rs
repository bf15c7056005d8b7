// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver traits
//!
//! A [`Driver`] describes one storage medium: whether the environment can
//! use it, and how to open a namespaced [`StoreHandle`] on it. Every store
//! instance gets its own handle; handles are never shared between instances.

use super::types::{DbInfo, DropTarget};
use crate::error::ForageResult;
use crate::value::Value;
use async_trait::async_trait;
use std::ops::ControlFlow;

/// Visitor passed to `StoreHandle::iterate`
///
/// Called with `(value, key, iteration_number)`; iteration numbers start at 1.
/// Returning `ControlFlow::Break` stops the scan.
pub type Visitor<'a> = dyn FnMut(Value, String, u32) -> ControlFlow<()> + Send + 'a;

/// Storage driver descriptor
#[async_trait]
pub trait Driver: Send + Sync {
    /// Unique driver name used in preferences and the registry
    fn name(&self) -> &str;

    /// Whether the current environment can use this driver
    ///
    /// Must be synchronous and free of side effects.
    fn is_supported(&self) -> bool;

    /// Asynchronous preparation run once when the driver is registered
    async fn prepare(&self) -> ForageResult<()> {
        Ok(())
    }

    /// Open a handle scoped to `info.name` / `info.store_name`
    async fn init_storage(&self, info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>>;

    /// Remove a whole database or a single store
    async fn drop_instance(&self, target: &DropTarget) -> ForageResult<()>;
}

/// Bound connection to one namespace on one driver
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Get a value by key, `None` when absent
    async fn get_item(&self, key: &str) -> ForageResult<Option<Value>>;

    /// Store a value, returning the value as stored
    async fn set_item(&self, key: &str, value: Value) -> ForageResult<Value>;

    async fn remove_item(&self, key: &str) -> ForageResult<()>;

    /// Remove every key of this namespace and nothing else
    async fn clear(&self) -> ForageResult<()>;

    async fn length(&self) -> ForageResult<usize>;

    /// Key at `index` in the driver's enumeration order
    async fn key(&self, index: usize) -> ForageResult<Option<String>>;

    async fn keys(&self) -> ForageResult<Vec<String>>;

    /// Visit every entry of this namespace in enumeration order
    async fn iterate(&self, visitor: &mut Visitor<'_>) -> ForageResult<()>;
}
