//! # Terrain Module
//!
//! Deterministic terrain generation over a rectangular footprint centred on the
//! origin. A 2D simplex heightmap decides the height of every column, each
//! column is filled with grass, dirt and stone, and a seeded random stream
//! scatters trees on top.
//!
//! ## Determinism
//!
//! The noise function and the random stream are both derived from the seed, and
//! columns are visited in a fixed order, so the same parameters always produce
//! the same support.

use cgmath::Point3;
use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{
    block::{block_type::BlockKind, BlockId, EMPTY},
    world::BlockStore,
};
use crate::error::{Result, VoxelError};

/// Lowest surface height any column can have.
pub const FLOOR_HEIGHT: i32 = 6;
/// Horizontal distance, in cells, covered by one unit of noise input.
pub const NOISE_SCALE: f64 = 50.0;
/// Probability that a column grows a tree.
pub const TREE_PROBABILITY: f64 = 0.02;
/// Minimum trunk height; one extra block is added half of the time.
pub const TRUNK_BASE_HEIGHT: i32 = 4;
/// Number of dirt layers directly under the grass.
pub const DIRT_DEPTH: i32 = 3;

/// Parameters of a generation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Extent along X. Columns cover `[-width/2, width/2)`.
    pub width: i32,
    /// Extent along Z. Columns cover `[-depth/2, depth/2)`.
    pub depth: i32,
    /// Exclusive upper bound on surface height.
    pub max_height: i32,
    /// Seed of the noise function and of the random stream.
    pub seed: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            width: 64,
            depth: 64,
            max_height: 48,
            seed: 0,
        }
    }
}

/// Summary of a generation run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of columns filled.
    pub columns: usize,
    /// Number of trees planted.
    pub trees: usize,
    /// Number of non-empty cells in the store afterwards.
    pub blocks: usize,
}

/// Foliage reaches this many cells from the trunk along X and Z.
pub const FOLIAGE_RADIUS: i32 = 2;

/// A tree waiting to be planted once every column exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeSite {
    /// Lowest trunk cell, directly above the column's grass.
    pub root: Point3<i32>,
    /// Number of trunk cells, `TRUNK_BASE_HEIGHT` or one more.
    pub trunk_height: i32,
}

impl TreeSite {
    /// The trunk cells, bottom to top.
    pub fn trunk(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        (0..self.trunk_height).map(move |i| Point3::new(self.root.x, self.root.y + i, self.root.z))
    }

    /// The foliage cells: every `(dx, dy, dz)` around the trunk top with
    /// `dy` in `0..=2` and `|dx| + |dz| + dy <= 3`.
    pub fn foliage(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        let crown = self.root.y + self.trunk_height - 1;
        (-FOLIAGE_RADIUS..=FOLIAGE_RADIUS).flat_map(move |dx| {
            (-FOLIAGE_RADIUS..=FOLIAGE_RADIUS).flat_map(move |dz| {
                (0..=2)
                    .filter(move |dy| dx.abs() + dz.abs() + dy <= 3)
                    .map(move |dy| Point3::new(self.root.x + dx, crown + dy, self.root.z + dz))
            })
        })
    }
}

/// Fills a [`BlockStore`] with terrain.
///
/// # Examples
///
/// ```
/// use voxel_sandbox::engine_state::voxels::{
///     block::BlockRegistry,
///     terrain::{TerrainGenerator, TerrainParams},
///     world::BlockStore,
/// };
///
/// let generator = TerrainGenerator::new(TerrainParams {
///     width: 8,
///     depth: 8,
///     max_height: 12,
///     seed: 7,
/// })
/// .unwrap();
/// let mut store = BlockStore::new(BlockRegistry::standard().into());
/// let stats = generator.generate(&mut store).unwrap();
/// assert_eq!(stats.columns, 64);
/// ```
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Simplex,
}

impl TerrainGenerator {
    /// Creates a generator for `params`.
    ///
    /// # Errors
    /// `BadArgument` if the footprint is not positive or if `max_height` leaves
    /// no room above [`FLOOR_HEIGHT`].
    pub fn new(params: TerrainParams) -> Result<Self> {
        if params.width <= 0 || params.depth <= 0 {
            return Err(VoxelError::BadArgument(format!(
                "footprint must be positive, got {}x{}",
                params.width, params.depth
            )));
        }
        if params.max_height <= FLOOR_HEIGHT {
            return Err(VoxelError::BadArgument(format!(
                "max height must exceed the floor height {FLOOR_HEIGHT}, got {}",
                params.max_height
            )));
        }

        Ok(TerrainGenerator {
            params,
            noise: Simplex::new(params.seed),
        })
    }

    /// The parameters this generator was built with.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Range of X coordinates covered by the footprint.
    pub fn x_range(&self) -> std::ops::Range<i32> {
        -(self.params.width / 2)..(self.params.width - self.params.width / 2)
    }

    /// Range of Z coordinates covered by the footprint.
    pub fn z_range(&self) -> std::ops::Range<i32> {
        -(self.params.depth / 2)..(self.params.depth - self.params.depth / 2)
    }

    /// Surface height of the column at `(x, z)`, in `[FLOOR_HEIGHT, max_height)`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let sample = self
            .noise
            .get([x as f64 / NOISE_SCALE, z as f64 / NOISE_SCALE]);
        let elevation = (sample * 0.5 + 0.5).clamp(0.0, 1.0);
        let span = self.params.max_height - FLOOR_HEIGHT;
        let offset = ((elevation * span as f64).floor() as i32).min(span - 1);
        offset + FLOOR_HEIGHT
    }

    /// The block a column of surface height `surface` holds at height `y`.
    pub fn layer_at(surface: i32, y: i32) -> BlockId {
        if y > surface || y < 0 {
            EMPTY
        } else if y == surface {
            BlockKind::GRASS.id()
        } else if y > surface - 1 - DIRT_DEPTH {
            BlockKind::DIRT.id()
        } else {
            BlockKind::STONE.id()
        }
    }

    /// Fills `store` with terrain and trees.
    ///
    /// All writes go through [`BlockStore::set_block`] inside a single batch.
    /// Foliage may extend two cells past the footprint.
    pub fn generate(&self, store: &mut BlockStore) -> Result<GenerationStats> {
        let start = Instant::now();
        let sites = self.tree_sites();
        let mut stats = GenerationStats::default();

        store.batch(|store| {
            for x in self.x_range() {
                for z in self.z_range() {
                    let surface = self.height_at(x, z);
                    for y in 0..=surface {
                        store.set_block(Point3::new(x, y, z), Self::layer_at(surface, y))?;
                    }
                    stats.columns += 1;
                }
            }

            for site in &sites {
                Self::plant_tree(store, site)?;
            }
            stats.trees = sites.len();
            Ok(())
        })?;

        stats.blocks = store.len();
        log::info!(
            "Generated {}x{} terrain (seed {}): {} columns, {} trees, {} blocks in {:?}",
            self.params.width,
            self.params.depth,
            self.params.seed,
            stats.columns,
            stats.trees,
            stats.blocks,
            start.elapsed()
        );
        Ok(stats)
    }

    /// Where trees grow, in planting order.
    ///
    /// Columns are visited in the same order as [`TerrainGenerator::generate`]
    /// fills them, drawing from a stream seeded with `seed`: one draw decides
    /// whether the column grows a tree, and a second picks its trunk height.
    pub fn tree_sites(&self) -> Vec<TreeSite> {
        let mut rng = fastrand::Rng::with_seed(u64::from(self.params.seed));
        let mut sites = Vec::new();
        for x in self.x_range() {
            for z in self.z_range() {
                if rng.f64() < TREE_PROBABILITY {
                    sites.push(TreeSite {
                        root: Point3::new(x, self.height_at(x, z) + 1, z),
                        trunk_height: TRUNK_BASE_HEIGHT + rng.i32(0..2),
                    });
                }
            }
        }
        sites
    }

    /// Grows the trunk of `site` and its foliage.
    ///
    /// Trees only fill empty cells, so they never carve into terrain or into
    /// each other.
    fn plant_tree(store: &mut BlockStore, site: &TreeSite) -> Result<()> {
        for cell in site.trunk() {
            Self::fill_if_empty(store, cell, BlockKind::WOOD.id())?;
        }
        for cell in site.foliage() {
            Self::fill_if_empty(store, cell, BlockKind::LEAVES.id())?;
        }
        Ok(())
    }

    fn fill_if_empty(store: &mut BlockStore, cell: Point3<i32>, id: BlockId) -> Result<()> {
        if store.get_block(cell) == EMPTY {
            store.set_block(cell, id)?;
        }
        Ok(())
    }
}
