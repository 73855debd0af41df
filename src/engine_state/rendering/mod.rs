//! # Rendering Module
//!
//! The bridge between the [`BlockStore`] and an external renderer.
//!
//! The store is the only source of truth; everything here is a derived,
//! refreshable view of it. A [`RenderAdapter`] keeps one batched draw primitive
//! per block id and is kept in sync through two operations:
//!
//! - [`RenderAdapter::rebuild`] discards every batch and reconstructs them from
//!   the store's current support.
//! - [`RenderAdapter::apply`] replays the edits collected in a [`RenderDelta`]
//!   since the last sync. Implementations may fall back to `rebuild`.
//!
//! After any mutation acknowledged by the store, the next `rebuild` or `apply`
//! leaves the visible set equal to the store's renderable support.

use crate::engine_state::voxels::world::{BlockChange, BlockStore, StoreChange};

mod batches;
mod instance;

pub use batches::{InstanceBatch, InstancedBatches};
pub use instance::Instance;

/// Edits observed on the store since the last sync.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderDelta {
    /// Committed edits, in invocation order.
    pub changes: Vec<BlockChange>,
    /// Whether the store was cleared, which invalidates every batch.
    pub reset: bool,
}

impl RenderDelta {
    /// Folds a store notification into this delta.
    ///
    /// A clear supersedes every earlier edit, so those are dropped.
    pub fn record(&mut self, change: &StoreChange) {
        match change {
            StoreChange::Edited(changes) => self.changes.extend_from_slice(changes),
            StoreChange::Cleared => {
                self.changes.clear();
                self.reset = true;
            }
        }
    }

    /// Whether there is nothing to sync.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && !self.reset
    }
}

/// Keeps a batched visual representation in sync with a [`BlockStore`].
pub trait RenderAdapter {
    /// Discards all batches and rebuilds them from `store`.
    fn rebuild(&mut self, store: &BlockStore);

    /// Brings the batches up to date with `delta`.
    ///
    /// The default implementation rebuilds from scratch.
    fn apply(&mut self, store: &BlockStore, _delta: &RenderDelta) {
        self.rebuild(store);
    }

    /// Applies `delta`, rebuilding instead when it carries a reset.
    fn sync(&mut self, store: &BlockStore, delta: &RenderDelta) {
        if delta.reset {
            self.rebuild(store);
        } else if !delta.changes.is_empty() {
            self.apply(store, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    fn edit(previous: u8, current: u8) -> StoreChange {
        StoreChange::Edited(vec![BlockChange {
            position: Point3::new(0, 0, 0),
            previous,
            current,
        }])
    }

    #[test]
    fn deltas_accumulate_edits_in_order() {
        let mut delta = RenderDelta::default();
        assert!(delta.is_empty());
        delta.record(&edit(0, 1));
        delta.record(&edit(1, 0));
        assert_eq!(delta.changes.len(), 2);
        assert_eq!(delta.changes[1].current, 0);
        assert!(!delta.reset);
    }

    #[test]
    fn clear_supersedes_earlier_edits() {
        let mut delta = RenderDelta::default();
        delta.record(&edit(0, 1));
        delta.record(&StoreChange::Cleared);
        delta.record(&edit(0, 2));
        assert!(delta.reset);
        assert_eq!(delta.changes.len(), 1);
    }
}
