// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for store operations
//!
//! Every public operation resolves to a [`ForageResult`]. The error is `Clone`
//! because a settled readiness outcome is handed to every operation waiting on
//! the same gate.

use thiserror::Error;

/// Error type for registry, resolution and storage operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForageError {
    /// Requested driver is unregistered or not supported by this environment
    #[error("Driver not found.")]
    DriverNotFound,

    /// Resolution exhausted every candidate without a successful initialization
    #[error("No available storage method found.")]
    NoAvailableStorage,

    /// A single driver rejected its initialization
    #[error("Driver '{driver}' failed to initialize: {reason}")]
    InitFailed { driver: String, reason: String },

    /// A custom driver could not be registered
    #[error("Custom driver not compliant: {0}")]
    DriverNotCompliant(String),

    #[error("Can't call config() after the store has been used.")]
    ConfigLocked,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Value encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Driver-specific failure (I/O, sled, custom backends)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ForageError {
    /// Build an initialization failure for the named driver
    pub fn init_failed(driver: impl Into<String>, reason: impl ToString) -> Self {
        ForageError::InitFailed {
            driver: driver.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for ForageError {
    fn from(e: std::io::Error) -> Self {
        ForageError::Storage(e.to_string())
    }
}

impl From<bincode::Error> for ForageError {
    fn from(e: bincode::Error) -> Self {
        ForageError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for ForageError {
    fn from(e: serde_json::Error) -> Self {
        ForageError::Serialization(e.to_string())
    }
}

#[cfg(feature = "sled-backend")]
impl From<sled::Error> for ForageError {
    fn from(e: sled::Error) -> Self {
        ForageError::Storage(e.to_string())
    }
}

/// Result type used throughout the crate
pub type ForageResult<T> = Result<T, ForageError>;
