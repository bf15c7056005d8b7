// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Readiness gate
//!
//! A gate owns one resolution attempt. The attempt starts the first time
//! anyone waits on the gate; every later wait observes the same settled
//! outcome. A new attempt always means a new gate.

use crate::driver::{DbInfo, DriverPreference, DriverRegistry};
use crate::error::ForageResult;
use crate::resolver::{resolve, Binding};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub(crate) struct ReadinessGate {
    registry: Arc<DriverRegistry>,
    preference: DriverPreference,
    /// `Err` when the store configuration was invalid; the gate then rejects
    info: ForageResult<DbInfo>,
    outcome: OnceCell<ForageResult<Arc<Binding>>>,
}

impl ReadinessGate {
    pub(crate) fn new(
        registry: Arc<DriverRegistry>,
        preference: DriverPreference,
        info: ForageResult<DbInfo>,
    ) -> Self {
        Self {
            registry,
            preference,
            info,
            outcome: OnceCell::new(),
        }
    }

    /// Wait for the gate to settle, starting resolution on first use
    pub(crate) async fn wait(&self) -> ForageResult<Arc<Binding>> {
        self.outcome
            .get_or_init(|| async {
                let info = self.info.clone()?;
                resolve(&self.registry, &self.preference, &info)
                    .await
                    .map(Arc::new)
            })
            .await
            .clone()
    }

    /// The bound driver, if the gate settled successfully
    pub(crate) fn binding(&self) -> Option<Arc<Binding>> {
        match self.outcome.get() {
            Some(Ok(binding)) => Some(binding.clone()),
            _ => None,
        }
    }

    pub(crate) fn preference(&self) -> &DriverPreference {
        &self.preference
    }
}
