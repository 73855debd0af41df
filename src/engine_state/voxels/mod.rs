//! # Voxel World Core
//!
//! This module contains the voxel world core: the block catalogue, the sparse
//! block store, procedural terrain, ray picking and the snapshot codec.
//!
//! ## Architecture
//!
//! * **Block**: The block registry and the six faces of a cell
//! * **World**: The `BlockStore`, sole authority for world state
//! * **Terrain**: Seeded heightmap terrain with scattered trees
//! * **Raycast**: DDA traversal returning the first struck cell and face
//! * **Snapshot**: JSON export/import of the store's support
//!
//! ## Data Flow
//!
//! 1. The terrain generator writes into the store once at start
//! 2. Input produces rays, answered by the raycaster
//! 3. Edits write back into the store
//! 4. Store notifications drive render batch updates
//! 5. Snapshots read or replace the store atomically
//!
//! ## Threading
//!
//! Everything here runs on one logical execution context. Nothing is `Sync`
//! and nothing needs to be.

pub mod block;
pub mod raycast;
pub mod snapshot;
pub mod terrain;
pub mod world;
