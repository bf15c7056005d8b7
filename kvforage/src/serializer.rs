// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value serialization for drivers
//!
//! Drivers persist bytes, not [`Value`]s. The store hands every driver the
//! serializer it was configured with; the store itself never encodes values.
//!
//! The default [`FramedSerializer`] writes a small frame:
//!
//! ```text
//! +-----+------------------+-----------------+
//! | tag | crc32 (u32, LE)  | payload ...     |
//! +-----+------------------+-----------------+
//! ```
//!
//! Tag 0 carries a bincode-encoded `Value`. Tag 1 carries the raw bytes of a
//! top-level `Value::Bytes`, so blobs are stored as-is.

use crate::error::{ForageError, ForageResult};
use crate::value::Value;
use std::fmt::Debug;

const TAG_ENCODED: u8 = 0;
const TAG_BLOB: u8 = 1;
const HEADER_LEN: usize = 5;

/// Encodes values into bytes a driver can store and back
pub trait Serializer: Send + Sync + Debug {
    fn serialize(&self, value: &Value) -> ForageResult<Vec<u8>>;

    fn deserialize(&self, bytes: &[u8]) -> ForageResult<Value>;
}

/// Default serializer: tagged, checksummed frames
#[derive(Debug, Default, Clone, Copy)]
pub struct FramedSerializer;

impl FramedSerializer {
    pub fn new() -> Self {
        Self
    }

    fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.push(tag);
        out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }
}

impl Serializer for FramedSerializer {
    fn serialize(&self, value: &Value) -> ForageResult<Vec<u8>> {
        match value {
            Value::Bytes(blob) => Ok(Self::frame(TAG_BLOB, blob)),
            other => {
                let payload = bincode::serialize(other)?;
                Ok(Self::frame(TAG_ENCODED, &payload))
            }
        }
    }

    fn deserialize(&self, bytes: &[u8]) -> ForageResult<Value> {
        if bytes.len() < HEADER_LEN {
            return Err(ForageError::Serialization(format!(
                "frame too short: {} bytes",
                bytes.len()
            )));
        }

        let tag = bytes[0];
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&bytes[1..HEADER_LEN]);
        let expected = u32::from_le_bytes(crc);
        let payload = &bytes[HEADER_LEN..];

        if crc32fast::hash(payload) != expected {
            return Err(ForageError::Serialization(
                "checksum mismatch, stored value is corrupted".to_string(),
            ));
        }

        match tag {
            TAG_ENCODED => Ok(bincode::deserialize(payload)?),
            TAG_BLOB => Ok(Value::Bytes(payload.to_vec())),
            unknown => Err(ForageError::Serialization(format!(
                "unknown frame tag {}",
                unknown
            ))),
        }
    }
}
