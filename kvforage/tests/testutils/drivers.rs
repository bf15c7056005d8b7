//! Scripted drivers for resolution tests

use async_trait::async_trait;
use kvforage::driver::{MemoryDriver, Visitor};
use kvforage::{DbInfo, Driver, DropTarget, ForageError, ForageResult, StoreHandle, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Supported, but every `init_storage` fails
pub struct FailingDriver {
    name: String,
    pub attempts: AtomicUsize,
}

impl FailingDriver {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Driver for FailingDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn init_storage(&self, _info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ForageError::init_failed(&self.name, "Test error"))
    }

    async fn drop_instance(&self, _target: &DropTarget) -> ForageResult<()> {
        Ok(())
    }
}

/// Registered but never usable; `init_storage` must never be reached
pub struct UnsupportedDriver {
    name: String,
    pub attempts: AtomicUsize,
}

impl UnsupportedDriver {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Driver for UnsupportedDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        false
    }

    async fn init_storage(&self, _info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ForageError::Storage("unsupported driver was initialized".to_string()))
    }

    async fn drop_instance(&self, _target: &DropTarget) -> ForageResult<()> {
        Ok(())
    }
}

/// Memory-backed driver that counts initializations, optionally slowly
pub struct CountingDriver {
    inner: MemoryDriver,
    delay: Duration,
    pub inits: AtomicUsize,
}

impl CountingDriver {
    pub fn new(name: &str) -> Arc<Self> {
        Self::with_delay(name, Duration::ZERO)
    }

    pub fn with_delay(name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryDriver::named(name),
            delay,
            inits: AtomicUsize::new(0),
        })
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for CountingDriver {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn init_storage(&self, info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.init_storage(info).await
    }

    async fn drop_instance(&self, target: &DropTarget) -> ForageResult<()> {
        self.inner.drop_instance(target).await
    }
}

/// Driver whose registration hook fails
pub struct PrepareFailingDriver;

#[async_trait]
impl Driver for PrepareFailingDriver {
    fn name(&self) -> &str {
        "prepareFailing"
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn prepare(&self) -> ForageResult<()> {
        Err(ForageError::DriverNotCompliant("prepare failed".to_string()))
    }

    async fn init_storage(&self, _info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        Err(ForageError::init_failed("prepareFailing", "never prepared"))
    }

    async fn drop_instance(&self, _target: &DropTarget) -> ForageResult<()> {
        Ok(())
    }
}

/// Memory-backed driver whose `get_item` waits before reading
pub struct SlowReadDriver {
    inner: MemoryDriver,
    delay: Duration,
}

impl SlowReadDriver {
    pub fn new(name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryDriver::named(name),
            delay,
        })
    }
}

#[async_trait]
impl Driver for SlowReadDriver {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn init_storage(&self, info: &DbInfo) -> ForageResult<Box<dyn StoreHandle>> {
        Ok(Box::new(SlowReadStore {
            inner: self.inner.init_storage(info).await?,
            delay: self.delay,
        }))
    }

    async fn drop_instance(&self, target: &DropTarget) -> ForageResult<()> {
        self.inner.drop_instance(target).await
    }
}

struct SlowReadStore {
    inner: Box<dyn StoreHandle>,
    delay: Duration,
}

#[async_trait]
impl StoreHandle for SlowReadStore {
    async fn get_item(&self, key: &str) -> ForageResult<Option<Value>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: Value) -> ForageResult<Value> {
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> ForageResult<()> {
        self.inner.remove_item(key).await
    }

    async fn clear(&self) -> ForageResult<()> {
        self.inner.clear().await
    }

    async fn length(&self) -> ForageResult<usize> {
        self.inner.length().await
    }

    async fn key(&self, index: usize) -> ForageResult<Option<String>> {
        self.inner.key(index).await
    }

    async fn keys(&self) -> ForageResult<Vec<String>> {
        self.inner.keys().await
    }

    async fn iterate(&self, visitor: &mut Visitor<'_>) -> ForageResult<()> {
        self.inner.iterate(visitor).await
    }
}
