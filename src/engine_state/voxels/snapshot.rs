//! # Snapshot Module
//!
//! Serialises a [`BlockStore`] to a JSON document and restores it again.
//!
//! ## Format
//!
//! ```json
//! { "version": 1, "blocks": [ { "k": "x,y,z", "id": 3 }, ... ] }
//! ```
//!
//! `k` is a comma-joined decimal triple of signed integers and `id` a block id
//! registered in the store's registry. `version` is written on encode and is
//! optional on decode, since older snapshots never carried it.
//!
//! ## Atomicity
//!
//! [`decode`] parses and validates the whole document before touching the
//! store, then replays it in a single store batch. A failure leaves the store
//! empty rather than partially populated.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::{
    block::{BlockId, EMPTY},
    world::BlockStore,
};
use crate::error::{Result, VoxelError};

/// Format version written by [`encode`].
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    blocks: Vec<SnapshotEntry>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    k: String,
    id: i64,
}

/// Recommended file name for a snapshot taken at `unix_ms`.
pub fn snapshot_file_name(unix_ms: u128) -> String {
    format!("voxel-world-{unix_ms}.json")
}

/// Formats a cell as a snapshot key.
pub fn format_key(position: Point3<i32>) -> String {
    format!("{},{},{}", position.x, position.y, position.z)
}

/// Parses a snapshot key back into a cell.
///
/// # Errors
/// `CorruptSnapshot` unless `key` is exactly three comma-separated `i32`s.
pub fn parse_key(key: &str) -> Result<Point3<i32>> {
    let corrupt = || VoxelError::CorruptSnapshot(format!("malformed coordinate key {key:?}"));

    let mut parts = key.split(',');
    let mut axis = || -> Result<i32> {
        parts
            .next()
            .ok_or_else(corrupt)?
            .parse::<i32>()
            .map_err(|_| corrupt())
    };
    let position = Point3::new(axis()?, axis()?, axis()?);
    if parts.next().is_some() {
        return Err(corrupt());
    }
    Ok(position)
}

/// Encodes every non-empty cell of `store`, each exactly once.
pub fn encode(store: &BlockStore) -> Result<Vec<u8>> {
    let document = SnapshotDocument {
        version: Some(SNAPSHOT_VERSION),
        blocks: store
            .support()
            .map(|(position, id)| SnapshotEntry {
                k: format_key(position),
                id: i64::from(id),
            })
            .collect(),
    };

    let bytes = serde_json::to_vec(&document)
        .map_err(|error| VoxelError::CorruptSnapshot(error.to_string()))?;
    log::debug!(
        "Encoded snapshot with {} blocks ({} bytes)",
        document.blocks.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Replaces the contents of `store` with the snapshot in `bytes`.
///
/// Entries with id 0 are skipped.
///
/// # Returns
/// The number of cells restored.
///
/// # Errors
/// `CorruptSnapshot` on JSON syntax errors, malformed keys, or ids that are
/// negative or not registered. The store is left empty.
pub fn decode(bytes: &[u8], store: &mut BlockStore) -> Result<usize> {
    let entries = match parse(bytes, store) {
        Ok(entries) => entries,
        Err(error) => {
            log::warn!("Rejected snapshot: {error}");
            store.clear();
            return Err(error);
        }
    };

    store.clear();
    let restored = store.batch(|store| {
        for (position, id) in &entries {
            store.set_block(*position, *id)?;
        }
        Ok(store.len())
    });

    match restored {
        Ok(count) => {
            log::info!("Restored snapshot with {count} blocks");
            Ok(count)
        }
        Err(error) => {
            store.clear();
            Err(VoxelError::CorruptSnapshot(error.to_string()))
        }
    }
}

/// Parses and validates a document without touching the store.
fn parse(bytes: &[u8], store: &BlockStore) -> Result<Vec<(Point3<i32>, BlockId)>> {
    let document: SnapshotDocument = serde_json::from_slice(bytes)
        .map_err(|error| VoxelError::CorruptSnapshot(error.to_string()))?;

    if let Some(version) = document.version {
        if version > SNAPSHOT_VERSION {
            log::warn!("Snapshot version {version} is newer than {SNAPSHOT_VERSION}, reading anyway");
        }
    }

    let registry = store.registry();
    let mut entries = Vec::with_capacity(document.blocks.len());
    for entry in document.blocks {
        let position = parse_key(&entry.k)?;
        let id = BlockId::try_from(entry.id).map_err(|_| {
            VoxelError::CorruptSnapshot(format!("block id {} out of range at {}", entry.id, entry.k))
        })?;
        if id == EMPTY {
            continue;
        }
        if !registry.contains(id) {
            return Err(VoxelError::CorruptSnapshot(format!(
                "unknown block id {id} at {}",
                entry.k
            )));
        }
        entries.push((position, id));
    }
    Ok(entries)
}
