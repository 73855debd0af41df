//! # View State
//!
//! Where the player stands and looks. The only physics is a vertical standing
//! check: if the cell under the feet is solid, the feet are snapped to the top
//! of that cell.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::{
    raycast::{cell_of, Ray},
    world::BlockStore,
};

/// Spawn point of a fresh session, above the centre of the generated footprint.
pub const SPAWN_POSITION: Point3<f32> = Point3 {
    x: 0.0,
    y: 25.0,
    z: 0.0,
};

/// The player's viewpoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Feet position in world space.
    pub position: Point3<f32>,
    /// Unit look direction.
    pub direction: Vector3<f32>,
    /// Whether the last standing check found ground.
    pub on_ground: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            position: SPAWN_POSITION,
            direction: Vector3::new(0.0, 0.0, -1.0),
            on_ground: false,
        }
    }
}

impl ViewState {
    /// Moves the view to `position` looking along `direction`.
    ///
    /// A zero direction keeps the previous one.
    pub fn move_to(&mut self, position: Point3<f32>, direction: Vector3<f32>) {
        self.position = position;
        let length = direction.magnitude();
        if length.is_finite() && length > 0.0 {
            self.direction = direction / length;
        }
    }

    /// The ray from the viewpoint along the look direction.
    pub fn look_ray(&self) -> Ray {
        Ray::new(self.position, self.direction)
    }

    /// Snaps the feet onto the cell below them if that cell is solid.
    ///
    /// A position with no addressable cell below it is never standing.
    ///
    /// # Returns
    /// Whether the view is standing on ground.
    pub fn settle(&mut self, store: &BlockStore) -> bool {
        let below = cell_of(self.position)
            .and_then(|feet| Some(Point3::new(feet.x, feet.y.checked_sub(1)?, feet.z)));
        self.on_ground = below.is_some_and(|below| store.registry().is_solid(store.get_block(below)));
        if let Some(below) = below.filter(|_| self.on_ground) {
            self.position.y = below.y as f32 + 1.0;
        }
        self.on_ground
    }
}
