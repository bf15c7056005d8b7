// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for kvforage
//!
//! One-shot commands against a single store: read and write keys, inspect
//! the store, drop data and list the available drivers.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::run;
