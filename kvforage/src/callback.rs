// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Callback-style observation of store futures
//!
//! Every store operation is a future returning [`ForageResult`]. Callers that
//! prefer a completion callback attach one with [`CallbackExt::with_callback`];
//! the callback sees the settled result by reference and the future still
//! yields that same result. A panicking callback is contained and logged.

use crate::error::{ForageError, ForageResult};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Await `operation`, then report its outcome to `callback`
pub async fn settle<T, Fut, F>(operation: Fut, callback: F) -> ForageResult<T>
where
    Fut: Future<Output = ForageResult<T>>,
    F: FnOnce(Result<&T, &ForageError>),
{
    let result = operation.await;
    notify(callback, &result);
    result
}

/// Invoke `callback` with a settled result, containing any panic
pub fn notify<T, F>(callback: F, result: &ForageResult<T>)
where
    F: FnOnce(Result<&T, &ForageError>),
{
    if catch_unwind(AssertUnwindSafe(|| callback(result.as_ref()))).is_err() {
        log::warn!("Store callback panicked; the operation result is unaffected");
    }
}

/// Attach a completion callback to any store future
pub trait CallbackExt<T>: Future<Output = ForageResult<T>> + Sized {
    fn with_callback<F>(self, callback: F) -> impl Future<Output = ForageResult<T>>
    where
        F: FnOnce(Result<&T, &ForageError>);
}

impl<T, Fut> CallbackExt<T> for Fut
where
    Fut: Future<Output = ForageResult<T>>,
{
    fn with_callback<F>(self, callback: F) -> impl Future<Output = ForageResult<T>>
    where
        F: FnOnce(Result<&T, &ForageError>),
    {
        settle(self, callback)
    }
}
