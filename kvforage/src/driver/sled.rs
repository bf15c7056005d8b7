// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation
//!
//! One sled database per database name under the data directory, one tree
//! per store name. Opened databases are shared process-wide per directory,
//! so sibling stores and sibling drivers use the same physical handle.

use super::traits::{Driver, StoreHandle, Visitor};
use super::types::{DbInfo, DropTarget, SLED_DRIVER};
use crate::error::{ForageError, ForageResult};
use crate::serializer::Serializer;
use crate::value::Value;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

/// Sled databases open in this process, keyed by canonical directory
///
/// sled locks a database directory for the lifetime of its handle, so every
/// driver rooted at the same directory must share one handle. Entries are
/// weak; a database closes once no driver holds it.
static OPEN_DATABASES: Lazy<Mutex<HashMap<PathBuf, Weak<sled::Db>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Open the database at `path`, reusing a handle already open in this process
fn open_shared(path: &Path) -> ForageResult<Arc<sled::Db>> {
    let mut open = OPEN_DATABASES.lock();
    if let Some(db) = open.get(path).and_then(Weak::upgrade) {
        return Ok(db);
    }
    open.retain(|_, db| db.strong_count() > 0);

    let db = Arc::new(sled::open(path)?);
    log::debug!("Opened sled database at {:?}", path);
    open.insert(path.to_path_buf(), Arc::downgrade(&db));
    Ok(db)
}

/// Sled driver implementation
pub struct SledDriver {
    root: Option<PathBuf>,
    /// Databases this driver has bound, keyed by directory name
    databases: Mutex<HashMap<String, Arc<sled::Db>>>,
}

impl SledDriver {
    /// Create a driver rooted at `root`; without a root it is unsupported
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            databases: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Directory name for a database
    ///
    /// ASCII letters, digits, `-` and `_` are kept; every other byte is
    /// percent-encoded, so distinct names never share a directory.
    pub fn directory_name(name: &str) -> String {
        let mut encoded = String::with_capacity(name.len());
        for byte in name.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                encoded.push(byte as char);
            } else {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
        encoded
    }

    /// Open (or reuse) the sled database for `name`
    fn database(&self, name: &str) -> ForageResult<Arc<sled::Db>> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ForageError::Storage("no data directory configured".to_string()))?;
        let directory = Self::directory_name(name);

        let mut databases = self.databases.lock();
        if let Some(db) = databases.get(&directory) {
            return Ok(db.clone());
        }

        std::fs::create_dir_all(root)?;
        let path = root.canonicalize()?.join(&directory);
        let db = open_shared(&path)?;
        log::debug!("Bound sled database '{}' at {:?}", name, path);
        databases.insert(directory, db.clone());
        Ok(db)
    }
}

impl Drop for SledDriver {
    fn drop(&mut self) {
        for (directory, db) in self.databases.lock().drain() {
            if let Err(e) = db.flush() {
                log::warn!("Failed to flush sled database '{}' on close: {}", directory, e);
            }
        }
    }
}

/// Whether `path`, or its nearest existing ancestor, is a writable directory
fn is_writable_dir(path: &Path) -> bool {
    let mut candidate = Some(path);
    while let Some(dir) = candidate {
        if let Ok(metadata) = std::fs::metadata(dir) {
            return metadata.is_dir() && !metadata.permissions().readonly();
        }
        candidate = dir.parent();
    }
    false
}

#[async_trait]
impl Driver for SledDriver {
    fn name(&self) -> &str {
        SLED_DRIVER
    }

    fn is_supported(&self) -> bool {
        self.root.as_deref().map_or(false, is_writable_dir)
    }

    async fn init_storage(&self, info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        let db = self
            .database(&info.name)
            .map_err(|e| ForageError::init_failed(SLED_DRIVER, e))?;
        let tree = db
            .open_tree(&info.store_name)
            .map_err(|e| ForageError::init_failed(SLED_DRIVER, e))?;

        Ok(Box::new(SledStore {
            tree,
            serializer: info.serializer.clone(),
        }))
    }

    async fn drop_instance(&self, target: &DropTarget) -> ForageResult<()> {
        let db = self.database(target.database())?;
        // Trees are cleared rather than dropped so live handles stay valid
        match target {
            DropTarget::Store { store_name, .. } => {
                db.open_tree(store_name)?.clear()?;
            }
            DropTarget::Database(_) => {
                for tree_name in db.tree_names() {
                    db.open_tree(&tree_name)?.clear()?;
                }
            }
        }
        db.flush()?;
        Ok(())
    }
}

/// Sled tree wrapper that implements the store handle
pub struct SledStore {
    tree: sled::Tree,
    serializer: Arc<dyn Serializer>,
}

impl SledStore {
    fn decode_key(raw: &[u8]) -> String {
        String::from_utf8_lossy(raw).to_string()
    }
}

#[async_trait]
impl StoreHandle for SledStore {
    async fn get_item(&self, key: &str) -> ForageResult<Option<Value>> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: Value) -> ForageResult<Value> {
        let bytes = self.serializer.serialize(&value)?;
        self.tree.insert(key.as_bytes(), bytes)?;
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> ForageResult<()> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    async fn clear(&self) -> ForageResult<()> {
        self.tree.clear()?;
        Ok(())
    }

    async fn length(&self) -> ForageResult<usize> {
        Ok(self.tree.len())
    }

    async fn key(&self, index: usize) -> ForageResult<Option<String>> {
        match self.tree.iter().keys().nth(index) {
            Some(raw) => Ok(Some(Self::decode_key(&raw?))),
            None => Ok(None),
        }
    }

    async fn keys(&self) -> ForageResult<Vec<String>> {
        self.tree
            .iter()
            .keys()
            .map(|raw| -> ForageResult<String> { Ok(Self::decode_key(&raw?)) })
            .collect()
    }

    async fn iterate(&self, visitor: &mut Visitor<'_>) -> ForageResult<()> {
        let mut iteration = 0u32;
        for entry in self.tree.iter() {
            let (raw_key, bytes) = entry?;
            iteration += 1;
            let value = self.serializer.deserialize(&bytes)?;
            if let ControlFlow::Break(()) = visitor(value, Self::decode_key(&raw_key), iteration) {
                break;
            }
        }
        Ok(())
    }
}
