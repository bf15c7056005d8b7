// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver resolution with fallback
//!
//! Candidates are filtered to supported drivers in preference order, then
//! initialized one at a time. The first successful initialization wins; a
//! failing driver is logged and skipped. Only when every candidate fails (or
//! there are none) does resolution fail, and then always with
//! `NoAvailableStorage`.

use crate::driver::{DbInfo, Driver, DriverPreference, DriverRegistry, StoreHandle};
use crate::error::{ForageError, ForageResult};
use log::{debug, info, warn};
use std::sync::Arc;

/// A driver bound to one store, with the handle it opened
pub(crate) struct Binding {
    driver: Arc<dyn Driver>,
    handle: Box<dyn StoreHandle>,
}

impl Binding {
    pub(crate) fn driver_name(&self) -> &str {
        self.driver.name()
    }

    pub(crate) fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub(crate) fn handle(&self) -> &dyn StoreHandle {
        self.handle.as_ref()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("driver", &self.driver_name())
            .finish()
    }
}

/// Resolve `preference` against `registry` and bind the first driver that
/// initializes
pub(crate) async fn resolve(
    registry: &DriverRegistry,
    preference: &DriverPreference,
    info: &DbInfo,
) -> ForageResult<Binding> {
    let candidates = match registry.supported_candidates(preference) {
        Some(candidates) => candidates,
        None => {
            warn!("Rejecting driver preference {}: not a name or list of names", preference);
            return Err(ForageError::NoAvailableStorage);
        }
    };
    debug!(
        "Resolving {}/{} with preference {}, supported candidates {:?}",
        info.name, info.store_name, preference, candidates
    );

    let mut failures: Vec<(String, ForageError)> = Vec::new();
    for name in candidates {
        // Re-registration may have replaced or removed the entry since filtering
        let Some(driver) = registry.get(&name) else {
            continue;
        };

        match driver.init_storage(info).await {
            Ok(handle) => {
                info!(
                    "Bound {}/{} to driver '{}'",
                    info.name, info.store_name, name
                );
                return Ok(Binding { driver, handle });
            }
            Err(e) => {
                warn!("Driver '{}' failed to initialize, trying next: {}", name, e);
                failures.push((name, e));
            }
        }
    }

    if !failures.is_empty() {
        debug!("All candidates failed to initialize: {:?}", failures);
    }
    Err(ForageError::NoAvailableStorage)
}
