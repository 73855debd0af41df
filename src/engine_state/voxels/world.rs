//! # World Module
//!
//! This module provides the `BlockStore`, the sole authority for world state. It
//! maps integer voxel coordinates to block ids and notifies listeners after
//! every committed batch of edits.
//!
//! ## Architecture
//!
//! The store is sparse: only non-empty cells are kept, keyed by their
//! coordinate in a hash map. Absent cells read as [`EMPTY`]. This keeps the
//! coordinate range unbounded (including negative `y`) at the cost of cache
//! locality.
//!
//! ## Change Notifications
//!
//! Listeners registered with [`BlockStore::on_change`] receive a
//! [`StoreChange`] after the mutation is committed:
//! - Outside a batch, each effective `set_block` notifies once.
//! - Inside [`BlockStore::batch`], edits are coalesced into one notification
//!   fired when the batch returns.
//! - `clear` notifies with [`StoreChange::Cleared`].
//!
//! Edits that change nothing (writing the id already present, removing an
//! absent cell) are not reported.

use std::{collections::HashMap, fmt, rc::Rc};

use cgmath::Point3;

use super::block::{BlockId, BlockRegistry, EMPTY};
use crate::error::{Result, VoxelError};

/// One committed edit of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockChange {
    /// The edited cell.
    pub position: Point3<i32>,
    /// The id before the edit ([`EMPTY`] if the cell was absent).
    pub previous: BlockId,
    /// The id after the edit ([`EMPTY`] if the cell was removed).
    pub current: BlockId,
}

/// A notification delivered to store listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreChange {
    /// One or more cells were edited, in invocation order.
    Edited(Vec<BlockChange>),
    /// Every entry was removed.
    Cleared,
}

type ChangeListener = Box<dyn FnMut(&StoreChange)>;

/// Sparse mapping from voxel coordinate to block id.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_sandbox::engine_state::voxels::{block::BlockRegistry, world::BlockStore};
///
/// let mut store = BlockStore::new(BlockRegistry::standard().into());
/// store.set_block(Point3::new(1, 2, 3), 2).unwrap();
/// assert_eq!(store.get_block(Point3::new(1, 2, 3)), 2);
///
/// store.set_block(Point3::new(1, 2, 3), 0).unwrap();
/// assert_eq!(store.get_block(Point3::new(1, 2, 3)), 0);
/// assert!(store.is_empty());
/// ```
pub struct BlockStore {
    registry: Rc<BlockRegistry>,
    blocks: HashMap<Point3<i32>, BlockId>,
    listeners: Vec<ChangeListener>,
    /// Edits collected while a batch is open.
    pending: Option<Vec<BlockChange>>,
}

impl BlockStore {
    /// Creates an empty store validating writes against `registry`.
    pub fn new(registry: Rc<BlockRegistry>) -> Self {
        BlockStore {
            registry,
            blocks: HashMap::new(),
            listeners: Vec::new(),
            pending: None,
        }
    }

    /// The registry this store validates against.
    pub fn registry(&self) -> &Rc<BlockRegistry> {
        &self.registry
    }

    /// Returns the id at `position`, or [`EMPTY`] if nothing is stored there.
    pub fn get_block(&self, position: Point3<i32>) -> BlockId {
        self.blocks.get(&position).copied().unwrap_or(EMPTY)
    }

    /// Writes `id` at `position`. Writing [`EMPTY`] removes the entry.
    ///
    /// # Errors
    /// `UnknownBlockKind` if `id` is non-empty and not registered. The store is
    /// left untouched in that case.
    pub fn set_block(&mut self, position: Point3<i32>, id: BlockId) -> Result<()> {
        let previous = if id == EMPTY {
            self.blocks.remove(&position)
        } else {
            if !self.registry.contains(id) {
                return Err(VoxelError::UnknownBlockKind(id));
            }
            self.blocks.insert(position, id)
        }
        .unwrap_or(EMPTY);

        if previous != id {
            self.record(BlockChange {
                position,
                previous,
                current: id,
            });
        }
        Ok(())
    }

    /// Enumerates every non-empty cell. Order is unspecified.
    pub fn support(&self) -> impl Iterator<Item = (Point3<i32>, BlockId)> + '_ {
        self.blocks.iter().map(|(position, id)| (*position, *id))
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the store holds no cells.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Removes every entry.
    ///
    /// Edits still pending in an open batch are superseded and dropped.
    pub fn clear(&mut self) {
        self.blocks.clear();
        if let Some(pending) = self.pending.as_mut() {
            pending.clear();
        }
        self.notify(&StoreChange::Cleared);
    }

    /// Registers a listener fired after each committed mutation.
    pub fn on_change(&mut self, listener: impl FnMut(&StoreChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Runs `edit` with notifications coalesced into a single
    /// [`StoreChange::Edited`] fired once `edit` returns.
    ///
    /// Edits made before an error are still committed and reported. Nested
    /// batches fold into the outermost one.
    pub fn batch<R>(&mut self, edit: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.pending.is_some() {
            return edit(self);
        }

        self.pending = Some(Vec::new());
        let result = edit(self);
        let changes = self.pending.take().unwrap_or_default();
        if !changes.is_empty() {
            self.notify(&StoreChange::Edited(changes));
        }
        result
    }

    fn record(&mut self, change: BlockChange) {
        match self.pending.as_mut() {
            Some(pending) => pending.push(change),
            None => self.notify(&StoreChange::Edited(vec![change])),
        }
    }

    fn notify(&mut self, change: &StoreChange) {
        for listener in self.listeners.iter_mut() {
            listener(change);
        }
    }
}

impl fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStore")
            .field("blocks", &self.blocks.len())
            .field("listeners", &self.listeners.len())
            .field("batching", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn store() -> BlockStore {
        BlockStore::new(Rc::new(BlockRegistry::standard()))
    }

    fn recorder(store: &mut BlockStore) -> Rc<RefCell<Vec<StoreChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.on_change(move |change| sink.borrow_mut().push(change.clone()));
        seen
    }

    #[test]
    fn empty_store_reads_empty() {
        let store = store();
        assert_eq!(store.get_block(Point3::new(0, 0, 0)), EMPTY);
        assert_eq!(store.get_block(Point3::new(-9, -9, -9)), EMPTY);
        assert!(store.is_empty());
    }

    #[test]
    fn set_then_remove() {
        let mut store = store();
        let p = Point3::new(1, 2, 3);
        store.set_block(p, 2).unwrap();
        assert_eq!(store.get_block(p), 2);
        store.set_block(p, EMPTY).unwrap();
        assert_eq!(store.get_block(p), EMPTY);
        assert_eq!(store.support().count(), 0);
    }

    #[test]
    fn unknown_ids_are_rejected_without_side_effects() {
        let mut store = store();
        let seen = recorder(&mut store);
        assert_eq!(
            store.set_block(Point3::new(0, 0, 0), 99),
            Err(VoxelError::UnknownBlockKind(99))
        );
        assert!(store.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn negative_coordinates_are_valid() {
        let mut store = store();
        store.set_block(Point3::new(-4, -20, -1), 3).unwrap();
        assert_eq!(store.get_block(Point3::new(-4, -20, -1)), 3);
    }

    #[test]
    fn each_effective_edit_notifies_once() {
        let mut store = store();
        let seen = recorder(&mut store);
        let p = Point3::new(0, 1, 0);

        store.set_block(p, 1).unwrap();
        store.set_block(p, 1).unwrap();
        store.set_block(p, 4).unwrap();
        store.set_block(Point3::new(5, 5, 5), EMPTY).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[1],
            StoreChange::Edited(vec![BlockChange {
                position: p,
                previous: 1,
                current: 4
            }])
        );
    }

    #[test]
    fn batches_coalesce_into_one_notification() {
        let mut store = store();
        let seen = recorder(&mut store);

        store
            .batch(|store| {
                for x in 0..10 {
                    store.set_block(Point3::new(x, 0, 0), 3)?;
                }
                Ok(())
            })
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            StoreChange::Edited(changes) => assert_eq!(changes.len(), 10),
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn failing_batch_still_reports_committed_edits() {
        let mut store = store();
        let seen = recorder(&mut store);

        let result = store.batch(|store| {
            store.set_block(Point3::new(0, 0, 0), 1)?;
            store.set_block(Point3::new(1, 0, 0), 42)
        });

        assert_eq!(result, Err(VoxelError::UnknownBlockKind(42)));
        assert_eq!(store.len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn clear_empties_and_notifies() {
        let mut store = store();
        store.set_block(Point3::new(0, 0, 0), 1).unwrap();
        let seen = recorder(&mut store);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(*seen.borrow(), vec![StoreChange::Cleared]);
    }
}
