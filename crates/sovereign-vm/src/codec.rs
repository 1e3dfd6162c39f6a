//! Binary encoding of call payloads and return data

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Result, VmError};

/// Encode a value as call data
pub fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    // Serializing plain data into a Vec cannot fail
    bincode::serialize(value).unwrap_or_default()
}

/// Decode call data, failing the frame on malformed input
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| VmError::Decode(e.to_string()))
}
