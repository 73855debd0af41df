//! # Application State Management
//!
//! This module owns a sandbox session and turns the command stream coming from
//! the input/UI layer into operations on the voxel core:
//! - Generating the starting world
//! - Breaking and placing blocks along a view ray
//! - Tracking the held block and the viewpoint
//! - Saving and loading snapshots
//!
//! After every command that mutates the store, the session drains the edits
//! collected by its store listener into the render adapter, so the batches a
//! renderer draws always match the store once the command returns.

pub mod config;
pub mod view;
#[cfg(target_family = "wasm")]
pub mod web;

use cgmath::{Point3, Vector3};

use config::SandboxConfig;
use view::ViewState;

use crate::{
    core::StResource,
    engine_state::{
        rendering::{InstancedBatches, RenderAdapter, RenderDelta},
        voxels::{
            block::{BlockId, BlockRegistry, EMPTY},
            raycast::{cell_of, raycast, Ray},
            snapshot,
            terrain::{GenerationStats, TerrainGenerator},
            world::BlockStore,
        },
    },
    error::{Result, VoxelError},
};

/// A command issued by the input/UI layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SandboxCommand {
    /// The player moved or turned.
    MoveView {
        /// New feet position.
        position: Point3<f32>,
        /// New look direction.
        direction: Vector3<f32>,
    },
    /// Remove the first block struck by the ray.
    BreakAt(Ray),
    /// Place a block against the first block struck by the ray.
    PlaceAt(Ray, BlockId),
    /// Change the block placed by default.
    SelectHeld(BlockId),
    /// Export the world.
    RequestSave,
    /// Replace the world with a snapshot.
    RequestLoad(Vec<u8>),
}

/// An encoded snapshot together with its suggested file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedSnapshot {
    /// Suggested download name, `voxel-world-<unix-ms>.json`.
    pub file_name: String,
    /// The JSON document.
    pub bytes: Vec<u8>,
}

/// What a command did.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    /// The view moved; reports whether it is standing on ground.
    ViewMoved {
        /// Result of the standing check.
        on_ground: bool,
    },
    /// The removed cell and its former id, if anything was in reach.
    Broken(Option<(Point3<i32>, BlockId)>),
    /// The filled cell, if a block was placed.
    Placed(Option<Point3<i32>>),
    /// The newly held block.
    HeldSelected(BlockId),
    /// The exported world.
    Saved(SavedSnapshot),
    /// Number of cells restored.
    Loaded(usize),
}

/// A running sandbox session.
///
/// # Examples
///
/// ```
/// use voxel_sandbox::application_state::{config::SandboxConfig, Sandbox};
/// use voxel_sandbox::engine_state::voxels::terrain::TerrainParams;
///
/// let config = SandboxConfig {
///     terrain: TerrainParams { width: 8, depth: 8, max_height: 12, seed: 5 },
///     ..SandboxConfig::default()
/// };
/// let sandbox = Sandbox::start(config).unwrap();
/// assert_eq!(sandbox.renderer().instance_count(), sandbox.store().len());
/// ```
pub struct Sandbox<R: RenderAdapter = InstancedBatches> {
    config: SandboxConfig,
    store: BlockStore,
    renderer: R,
    /// Edits recorded by the store listener since the last render sync.
    pending: StResource<RenderDelta>,
    view: ViewState,
    held: BlockId,
}

impl Sandbox<InstancedBatches> {
    /// Creates a session with the built-in instance batches and generates its
    /// starting world.
    pub fn start(config: SandboxConfig) -> Result<Self> {
        let mut sandbox = Self::new(config, BlockRegistry::standard(), InstancedBatches::new())?;
        sandbox.generate()?;
        Ok(sandbox)
    }
}

impl<R: RenderAdapter> Sandbox<R> {
    /// Creates a session with an empty world.
    ///
    /// # Errors
    /// `UnknownBlockKind` if the configured held block is not registered.
    pub fn new(config: SandboxConfig, registry: BlockRegistry, renderer: R) -> Result<Self> {
        if !registry.contains(config.held_block) {
            return Err(VoxelError::UnknownBlockKind(config.held_block));
        }

        let mut store = BlockStore::new(registry.into());
        let pending = StResource::new(RenderDelta::default());
        let sink = pending.clone();
        store.on_change(move |change| sink.get_mut().record(change));

        Ok(Sandbox {
            held: config.held_block,
            config,
            store,
            renderer,
            pending,
            view: ViewState::default(),
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// The world.
    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    /// The render adapter mirroring the world.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The player's viewpoint.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// The block placed by [`Sandbox::place_held`].
    pub fn held(&self) -> BlockId {
        self.held
    }

    /// Fills the world with terrain from the configured parameters and
    /// rebuilds every batch.
    pub fn generate(&mut self) -> Result<GenerationStats> {
        let generator = TerrainGenerator::new(self.config.terrain)?;
        let result = generator.generate(&mut self.store);

        // A full rebuild is cheaper than replaying every generated cell.
        self.pending.take();
        self.renderer.rebuild(&self.store);
        result
    }

    /// Dispatches a command from the input/UI layer.
    pub fn handle(&mut self, command: SandboxCommand) -> Result<CommandOutcome> {
        match command {
            SandboxCommand::MoveView {
                position,
                direction,
            } => Ok(CommandOutcome::ViewMoved {
                on_ground: self.move_view(position, direction),
            }),
            SandboxCommand::BreakAt(ray) => self.break_at(&ray).map(CommandOutcome::Broken),
            SandboxCommand::PlaceAt(ray, id) => self.place_at(&ray, id).map(CommandOutcome::Placed),
            SandboxCommand::SelectHeld(id) => {
                self.select_held(id)?;
                Ok(CommandOutcome::HeldSelected(id))
            }
            SandboxCommand::RequestSave => self.save(unix_millis()).map(CommandOutcome::Saved),
            SandboxCommand::RequestLoad(bytes) => self.load(&bytes).map(CommandOutcome::Loaded),
        }
    }

    /// Moves the view and runs the standing check.
    pub fn move_view(&mut self, position: Point3<f32>, direction: Vector3<f32>) -> bool {
        self.view.move_to(position, direction);
        self.view.settle(&self.store)
    }

    /// Removes the first block struck by `ray` within reach.
    ///
    /// # Returns
    /// The removed cell and its former id, or `None` if the ray hit nothing.
    pub fn break_at(&mut self, ray: &Ray) -> Result<Option<(Point3<i32>, BlockId)>> {
        let Some(hit) = raycast(&self.store, ray, self.config.reach)? else {
            return Ok(None);
        };

        self.store.set_block(hit.cell, EMPTY)?;
        self.sync_render();
        log::debug!("Broke block {} at {:?}", hit.block, hit.cell);
        Ok(Some((hit.cell, hit.block)))
    }

    /// Places `id` in the empty cell in front of the face struck by `ray`.
    ///
    /// When the ray hits nothing within reach, the block goes into the cell
    /// `place_distance` along the ray instead. Nothing is placed when the ray
    /// starts inside a block, the target cell is occupied, or the fallback
    /// point lies outside the addressable cell range.
    ///
    /// # Returns
    /// The filled cell, if any.
    ///
    /// # Errors
    /// `UnknownBlockKind` if `id` is not registered.
    pub fn place_at(&mut self, ray: &Ray, id: BlockId) -> Result<Option<Point3<i32>>> {
        if !self.store.registry().contains(id) {
            return Err(VoxelError::UnknownBlockKind(id));
        }

        let target = match raycast(&self.store, ray, self.config.reach)? {
            Some(hit) => hit.adjacent_cell(),
            None => cell_of(ray.at(self.config.place_distance)),
        };

        let Some(cell) = target.filter(|cell| self.store.get_block(*cell) == EMPTY) else {
            return Ok(None);
        };

        self.store.set_block(cell, id)?;
        self.sync_render();
        log::debug!("Placed block {id} at {cell:?}");
        Ok(Some(cell))
    }

    /// Places the held block along `ray`.
    pub fn place_held(&mut self, ray: &Ray) -> Result<Option<Point3<i32>>> {
        self.place_at(ray, self.held)
    }

    /// Changes the held block.
    ///
    /// # Errors
    /// `UnknownBlockKind` if `id` is not registered; the held block is kept.
    pub fn select_held(&mut self, id: BlockId) -> Result<()> {
        if !self.store.registry().contains(id) {
            return Err(VoxelError::UnknownBlockKind(id));
        }
        self.held = id;
        Ok(())
    }

    /// Encodes the world, naming the snapshot after `unix_ms`.
    pub fn save(&self, unix_ms: u128) -> Result<SavedSnapshot> {
        let bytes = snapshot::encode(&self.store)?;
        let file_name = snapshot::snapshot_file_name(unix_ms);
        log::info!("Saved {} blocks as {file_name}", self.store.len());
        Ok(SavedSnapshot { file_name, bytes })
    }

    /// Replaces the world with the snapshot in `bytes`.
    ///
    /// On failure the world is left empty, and the batches reflect that.
    pub fn load(&mut self, bytes: &[u8]) -> Result<usize> {
        let result = snapshot::decode(bytes, &mut self.store);
        self.sync_render();
        result
    }

    /// Pushes edits recorded since the last sync into the render adapter.
    pub fn sync_render(&mut self) {
        let delta = self.pending.take();
        if !delta.is_empty() {
            self.renderer.sync(&self.store, &delta);
        }
    }
}

fn unix_millis() -> u128 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
