//! # Engine State Module
//!
//! The engine side of the sandbox: the voxel world core and the render
//! adapter that mirrors it into draw-ready batches.
//!
//! ## Key Components
//!
//! * `voxels` - Block registry, block store, terrain, raycasting and snapshots
//! * `rendering` - Batched instance representation kept in sync with the store

pub mod rendering;
pub mod voxels;
