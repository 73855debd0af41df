//! # Sandbox Configuration
//!
//! Tunables for a sandbox session. Every field has a default, so a config
//! document only needs to name the values it changes.

use serde::{Deserialize, Serialize};

use crate::{
    engine_state::voxels::{
        block::{block_type::BlockKind, BlockId},
        terrain::TerrainParams,
    },
    error::{Result, VoxelError},
};

/// Default reach, in cells, for breaking and placing blocks.
pub const DEFAULT_REACH: f32 = 100.0;
/// Distance in front of the view where a block is placed when nothing is hit.
pub const DEFAULT_PLACE_DISTANCE: f32 = 5.0;

/// Configuration of a sandbox session.
///
/// # Examples
///
/// ```
/// use voxel_sandbox::application_state::config::SandboxConfig;
///
/// let config = SandboxConfig::from_json(r#"{ "terrain": { "width": 16, "depth": 16, "max_height": 24, "seed": 3 } }"#).unwrap();
/// assert_eq!(config.terrain.width, 16);
/// assert_eq!(config.reach, 100.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Terrain generated when the session starts.
    pub terrain: TerrainParams,
    /// Maximum ray length for break and place commands.
    pub reach: f32,
    /// Placement distance used when a place ray hits nothing.
    pub place_distance: f32,
    /// Block held when the session starts.
    pub held_block: BlockId,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        SandboxConfig {
            terrain: TerrainParams::default(),
            reach: DEFAULT_REACH,
            place_distance: DEFAULT_PLACE_DISTANCE,
            held_block: BlockKind::GRASS.id(),
        }
    }
}

impl SandboxConfig {
    /// Parses a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    /// `BadArgument` if the document is not valid JSON or a field has the wrong
    /// type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|error| VoxelError::BadArgument(format!("invalid sandbox config: {error}")))
    }
}
