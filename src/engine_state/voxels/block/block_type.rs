//! # Block Type Module
//!
//! This module defines the kinds of blocks that exist in the sandbox and the
//! attributes the rest of the core needs to know about each of them.

use num_derive::FromPrimitive;

use super::BlockId;

/// Enumerates the block kinds with stable ids.
///
/// The discriminants are the ids written into snapshots, so they must never be
/// reordered. New kinds are only ever appended at the tail.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockKind {
    /// The surface layer of every generated column.
    GRASS = 1,

    /// The three layers directly under the grass.
    DIRT = 2,

    /// Everything below the dirt.
    STONE = 3,

    /// Tree trunks.
    WOOD = 4,

    /// Tree foliage.
    LEAVES = 5,
}

impl BlockKind {
    /// Every kind, in id order.
    pub const ALL: [BlockKind; 5] = [
        BlockKind::GRASS,
        BlockKind::DIRT,
        BlockKind::STONE,
        BlockKind::WOOD,
        BlockKind::LEAVES,
    ];

    /// Returns the stable id of this kind.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// Converts an id back into a kind.
    ///
    /// # Returns
    /// `None` for the empty id and for ids that have no named kind.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }
}

/// How a block looks, enough for a renderer to pick one material per batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Appearance {
    /// A flat 24-bit RGB colour.
    Color(u32),
    /// The identifier of a texture the renderer knows how to load.
    Texture(&'static str),
}

/// Semantic attributes of a registered block id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    /// Display name, also used by inventory widgets.
    pub name: &'static str,
    /// Whether the block occupies space and is drawn.
    pub solid: bool,
    /// Surface appearance handed to the renderer.
    pub appearance: Appearance,
}

impl BlockType {
    /// Creates a solid block type with a flat colour.
    pub const fn solid_color(name: &'static str, rgb: u32) -> Self {
        BlockType {
            name,
            solid: true,
            appearance: Appearance::Color(rgb & 0x00ff_ffff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_ids() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BlockKind::from_id(0), None);
        assert_eq!(BlockKind::from_id(6), None);
    }

    #[test]
    fn stable_id_assignments() {
        assert_eq!(BlockKind::GRASS.id(), 1);
        assert_eq!(BlockKind::DIRT.id(), 2);
        assert_eq!(BlockKind::STONE.id(), 3);
        assert_eq!(BlockKind::WOOD.id(), 4);
        assert_eq!(BlockKind::LEAVES.id(), 5);
    }
}
