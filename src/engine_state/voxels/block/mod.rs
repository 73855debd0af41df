//! # Block Module
//!
//! This module provides the block catalogue shared by the generator, the
//! renderer and the snapshot codec. It maps a block id to its semantic
//! attributes and is read-only once constructed.

use std::collections::BTreeMap;

use block_type::BlockType;

use crate::error::{Result, VoxelError};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block ids in memory and in
/// snapshots.
pub type BlockId = u8;

/// The reserved id for an empty cell. It is never registered and never stored.
pub const EMPTY: BlockId = 0;

/// The standard block table.
///
/// Ids are stable across snapshots; new entries are appended at the tail.
pub static STANDARD_BLOCK_TYPES: phf::Map<u8, BlockType> = phf::phf_map! {
    1u8 => BlockType::solid_color("Grass", 0x55aa44),
    2u8 => BlockType::solid_color("Dirt", 0x8b5a2b),
    3u8 => BlockType::solid_color("Stone", 0x888888),
    4u8 => BlockType::solid_color("Wood", 0x8b6b2b),
    5u8 => BlockType::solid_color("Leaves", 0x2f9b2f),
};

/// Catalogue of registered block types.
///
/// # Examples
///
/// ```
/// use voxel_sandbox::engine_state::voxels::block::{BlockRegistry, EMPTY};
///
/// let registry = BlockRegistry::standard();
/// assert_eq!(registry.get(1).map(|t| t.name), Some("Grass"));
/// assert!(registry.get(EMPTY).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    types: BTreeMap<BlockId, BlockType>,
}

impl BlockRegistry {
    /// Builds the registry holding the standard block table.
    pub fn standard() -> Self {
        BlockRegistry {
            types: STANDARD_BLOCK_TYPES
                .entries()
                .map(|(id, block_type)| (*id, *block_type))
                .collect(),
        }
    }

    /// Builds the standard registry extended with additional types.
    ///
    /// # Errors
    /// `BadArgument` if an extra type tries to claim the empty id or an id that
    /// is already registered.
    pub fn with_types(extra: impl IntoIterator<Item = (BlockId, BlockType)>) -> Result<Self> {
        let mut registry = Self::standard();
        for (id, block_type) in extra {
            if id == EMPTY {
                return Err(VoxelError::BadArgument(
                    "block id 0 is reserved for empty cells".to_string(),
                ));
            }
            if registry.types.insert(id, block_type).is_some() {
                return Err(VoxelError::BadArgument(format!(
                    "block id {id} is already registered"
                )));
            }
        }
        Ok(registry)
    }

    /// Looks up the attributes of `id`.
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.types.get(&id)
    }

    /// All registered ids in ascending order. Never contains [`EMPTY`].
    pub fn ids(&self) -> Vec<BlockId> {
        self.types.keys().copied().collect()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: BlockId) -> bool {
        self.types.contains_key(&id)
    }

    /// Whether `id` is registered and solid.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|block_type| block_type.solid)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
