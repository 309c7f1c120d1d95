//! Structured dumps and binary snapshots of a row store.

use rowlink_foundation::{Error, ErrorKind, Result};
use rowlink_storage::RowStore;

fn serialization_error(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::SerializationError(err.to_string()))
}

/// Renders every table and row of a store as JSON.
///
/// # Errors
///
/// Returns a serialization error if a value cannot be encoded.
pub fn dump_json(store: &RowStore, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(store)
    } else {
        serde_json::to_string(store)
    };
    rendered.map_err(serialization_error)
}

/// Encodes a store as a MessagePack snapshot.
///
/// # Errors
///
/// Returns a serialization error if a value cannot be encoded.
pub fn to_bytes(store: &RowStore) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(store).map_err(serialization_error)
}

/// Decodes a MessagePack snapshot.
///
/// # Errors
///
/// Returns a serialization error if the bytes are not a valid snapshot.
pub fn from_bytes(bytes: &[u8]) -> Result<RowStore> {
    rmp_serde::from_slice(bytes).map_err(serialization_error)
}
