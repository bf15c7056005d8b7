// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage drivers
//!
//! This module provides the trait-based abstraction over storage media,
//! the registry drivers are looked up in, and the built-in drivers.
//!
//! # Architecture
//!
//! ```text
//! Forage (store instance, readiness gate, dispatch)
//!     ↓
//! DriverRegistry (name → Driver, capability probing, default order)
//!     ↓
//! Driver::init_storage → StoreHandle (one per store instance)
//!     ↓
//! Concrete Implementations (sled, memory, custom)
//! ```

// Core modules
pub mod factory;
pub mod registry;
pub mod traits;
pub mod types;

// Driver implementations
pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;

pub use factory::create_default_drivers;
pub use memory::{MemoryDriver, MemoryMedium};
pub use registry::DriverRegistry;
#[cfg(feature = "sled-backend")]
pub use self::sled::SledDriver;
pub use traits::{Driver, StoreHandle, Visitor};
pub use types::{
    database_prefix, store_prefix, DbInfo, DriverPreference, DropTarget, MEMORY_DRIVER, SLED_DRIVER,
};
