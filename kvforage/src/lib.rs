// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! kvforage - An async key-value store over pluggable storage drivers
//!
//! A [`Forage`] is a named key-value store. It binds lazily to the first
//! supported driver in its preference order that initializes, falling back
//! through the list when a driver fails, and then forwards every operation
//! to that driver.
//!
//! # Features
//!
//! - **Pluggable drivers**: register custom drivers next to the built-ins
//! - **Fallback resolution**: unsupported or failing drivers are skipped
//! - **Namespaced stores**: `name` / `storeName` isolate keys between instances
//! - **Persistent storage**: Uses Sled for embedded storage (`sled-backend`)
//! - **Callbacks**: attach a completion callback to any operation
//!
//! # Usage
//!
//! ```no_run
//! use kvforage::{CallbackExt, Forage, StoreConfig};
//!
//! # async fn demo() -> kvforage::ForageResult<()> {
//! let store = Forage::with_data_dir("./kvforage-data", StoreConfig::new().name("app"));
//! store.set_item("greeting", "hello").await?;
//! let value = store
//!     .get_item("greeting")
//!     .with_callback(|result| println!("{:?}", result))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod config;
pub mod driver;
pub mod error;
pub mod instance;
pub mod serializer;
pub mod value;

pub(crate) mod gate;
pub(crate) mod resolver;

pub use callback::CallbackExt;
pub use config::StoreConfig;
pub use driver::{
    DbInfo, Driver, DriverPreference, DriverRegistry, DropTarget, MemoryDriver, StoreHandle,
    MEMORY_DRIVER, SLED_DRIVER,
};
pub use error::{ForageError, ForageResult};
pub use instance::{DropOptions, Forage};
pub use serializer::{FramedSerializer, Serializer};
pub use value::Value;

/// kvforage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// kvforage crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
