//! Test utilities for kvforage integration tests
//!
//! - TestFixture: a registry with the built-in drivers over a temporary data dir
//! - drivers: custom drivers with scripted failures and counters

#![allow(dead_code)]

pub mod drivers;
pub mod test_fixture;
