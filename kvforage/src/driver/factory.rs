// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Built-in driver factory
//!
//! Creates the drivers this environment ships with, best first. The order
//! returned here becomes the registry's default priority order.

use super::memory::MemoryDriver;
use super::traits::Driver;
use std::path::PathBuf;
use std::sync::Arc;

/// Create the built-in drivers in default priority order
///
/// # Arguments
/// * `data_dir` - Root directory for persistent drivers; without one the
///   persistent drivers are still registered but report themselves unsupported
pub fn create_default_drivers(data_dir: Option<PathBuf>) -> Vec<Arc<dyn Driver>> {
    let mut drivers: Vec<Arc<dyn Driver>> = Vec::new();

    #[cfg(feature = "sled-backend")]
    {
        use super::sled::SledDriver;
        drivers.push(Arc::new(SledDriver::new(data_dir)));
    }
    #[cfg(not(feature = "sled-backend"))]
    {
        let _ = data_dir;
    }

    drivers.push(Arc::new(MemoryDriver::new()));
    drivers
}
