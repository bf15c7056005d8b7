//! Test fixture for kvforage integration tests
//!
//! Every fixture owns its own registry and temporary data directory, so tests
//! can run in parallel without sharing keys.

use kvforage::{DriverRegistry, Forage, StoreConfig};
use std::sync::Arc;

/// Initialize logging once per test binary; honours RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestFixture {
    registry: Arc<DriverRegistry>,
    _temp_dir: tempfile::TempDir,
}

impl TestFixture {
    /// Registry with the built-in drivers, sled rooted in a temp dir
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        init_logging();
        let temp_dir = tempfile::tempdir()?;
        let registry = DriverRegistry::with_default_drivers(Some(temp_dir.path().join("data")));
        Ok(Self {
            registry: Arc::new(registry),
            _temp_dir: temp_dir,
        })
    }

    /// Empty registry; tests define the drivers they need
    pub fn empty() -> Result<Self, Box<dyn std::error::Error>> {
        init_logging();
        Ok(Self {
            registry: Arc::new(DriverRegistry::new()),
            _temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn registry(&self) -> &Arc<DriverRegistry> {
        &self.registry
    }

    pub fn store(&self, config: StoreConfig) -> Forage {
        Forage::new(self.registry.clone(), config)
    }

    /// Store pinned to a single driver
    pub fn store_on(&self, driver: &str, config: StoreConfig) -> Forage {
        self.store(config.driver(driver))
    }
}
