//! CPU-side instance batches, one per block id.
//!
//! Each [`InstanceBatch`] is a dense array of [`Instance`] records that an
//! external renderer uploads as the instance buffer of a single draw call. Cells
//! are tracked by slot so that an incremental update can insert or remove a
//! single instance in O(1) with a swap-remove, instead of rebuilding every
//! batch on every click.
//!
//! Batches are keyed by block id. When the last cell of an id disappears its
//! batch is released, so renderers can drop the matching GPU resources.

use std::collections::{BTreeMap, HashMap};

use cgmath::Point3;

use super::{instance::Instance, RenderAdapter, RenderDelta};
use crate::engine_state::voxels::{
    block::{block_type::Appearance, BlockId, BlockRegistry, EMPTY},
    world::BlockStore,
};

/// All instances of a single block id.
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    block_id: BlockId,
    appearance: Appearance,
    instances: Vec<Instance>,
    /// The cell behind each instance, parallel to `instances`.
    cells: Vec<Point3<i32>>,
    /// Index of each cell in `instances`.
    slots: HashMap<Point3<i32>, usize>,
}

impl InstanceBatch {
    fn new(block_id: BlockId, appearance: Appearance) -> Self {
        InstanceBatch {
            block_id,
            appearance,
            instances: Vec::new(),
            cells: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// The block id every instance in this batch shares.
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// The material the renderer should use for this batch.
    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// The instance records, ready for upload.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// The instance records as raw bytes.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// The cells drawn by this batch, in instance order.
    pub fn cells(&self) -> &[Point3<i32>] {
        &self.cells
    }

    /// Whether `cell` is drawn by this batch.
    pub fn contains(&self, cell: Point3<i32>) -> bool {
        self.slots.contains_key(&cell)
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the batch draws nothing.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn insert(&mut self, cell: Point3<i32>) {
        if self.slots.contains_key(&cell) {
            return;
        }
        self.slots.insert(cell, self.instances.len());
        self.instances.push(Instance::for_cell(cell));
        self.cells.push(cell);
    }

    fn remove(&mut self, cell: Point3<i32>) {
        let Some(slot) = self.slots.remove(&cell) else {
            return;
        };
        self.instances.swap_remove(slot);
        self.cells.swap_remove(slot);
        if let Some(moved) = self.cells.get(slot) {
            self.slots.insert(*moved, slot);
        }
    }
}

/// A [`RenderAdapter`] that keeps one [`InstanceBatch`] per renderable id.
///
/// Cells whose id is unregistered or not solid are left out.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_sandbox::engine_state::{
///     rendering::{InstancedBatches, RenderAdapter},
///     voxels::{block::BlockRegistry, world::BlockStore},
/// };
///
/// let mut store = BlockStore::new(BlockRegistry::standard().into());
/// store.set_block(Point3::new(0, 0, 0), 1).unwrap();
/// store.set_block(Point3::new(1, 0, 0), 3).unwrap();
///
/// let mut batches = InstancedBatches::new();
/// batches.rebuild(&store);
/// assert_eq!(batches.batch_count(), 2);
/// assert_eq!(batches.batch(1).unwrap().instances()[0].position, [0.5, 0.5, 0.5]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InstancedBatches {
    batches: BTreeMap<BlockId, InstanceBatch>,
    rebuilds: usize,
}

impl InstancedBatches {
    /// Creates an adapter with no batches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The batch for `id`, if any cell of that id is visible.
    pub fn batch(&self, id: BlockId) -> Option<&InstanceBatch> {
        self.batches.get(&id)
    }

    /// Every live batch, in id order.
    pub fn batches(&self) -> impl Iterator<Item = &InstanceBatch> {
        self.batches.values()
    }

    /// Number of live batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Total number of instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.values().map(InstanceBatch::len).sum()
    }

    /// Every visible cell with its id.
    pub fn visible_cells(&self) -> impl Iterator<Item = (Point3<i32>, BlockId)> + '_ {
        self.batches
            .values()
            .flat_map(|batch| batch.cells.iter().map(move |cell| (*cell, batch.block_id)))
    }

    /// How many full rebuilds have run.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    fn insert(&mut self, registry: &BlockRegistry, cell: Point3<i32>, id: BlockId) {
        let Some(block_type) = registry.get(id).filter(|block_type| block_type.solid) else {
            return;
        };
        self.batches
            .entry(id)
            .or_insert_with(|| InstanceBatch::new(id, block_type.appearance))
            .insert(cell);
    }

    fn remove(&mut self, cell: Point3<i32>, id: BlockId) {
        if let Some(batch) = self.batches.get_mut(&id) {
            batch.remove(cell);
            if batch.is_empty() {
                self.batches.remove(&id);
            }
        }
    }
}

impl RenderAdapter for InstancedBatches {
    fn rebuild(&mut self, store: &BlockStore) {
        self.batches.clear();
        let registry = store.registry().clone();
        for (cell, id) in store.support() {
            self.insert(&registry, cell, id);
        }
        self.rebuilds += 1;
        log::debug!(
            "Rebuilt {} batches with {} instances",
            self.batches.len(),
            self.instance_count()
        );
    }

    fn apply(&mut self, store: &BlockStore, delta: &RenderDelta) {
        let registry = store.registry().clone();
        for change in &delta.changes {
            if change.previous != EMPTY {
                self.remove(change.position, change.previous);
            }
            if change.current != EMPTY {
                self.insert(&registry, change.position, change.current);
            }
        }
        log::trace!("Applied {} edits to batches", delta.changes.len());
    }
}
