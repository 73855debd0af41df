//! # Raycast Module
//!
//! Voxel picking over a [`BlockStore`] using a 3D digital differential analyser
//! (DDA) traversal. The ray visits every cell its segment passes through, in
//! order, so it never skips thin cells and always knows which face it entered
//! a cell through.
//!
//! For each axis the traversal keeps the ray parameter `t_max` at which the ray
//! crosses the next integer plane on that axis, and `t_delta`, the parameter
//! distance between two such planes. Each iteration steps along the axis with
//! the smallest `t_max`. An axis whose direction component is zero has an
//! infinite `t_max` and is never stepped along.

use cgmath::{InnerSpace, Point3, Vector3};

use super::{
    block::{block_side::BlockSide, BlockId, EMPTY},
    world::BlockStore,
};
use crate::error::{Result, VoxelError};

/// A half-line in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Starting point.
    pub origin: Point3<f32>,
    /// Direction of travel. Need not be normalised.
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray from `origin` towards `direction`.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray { origin, direction }
    }

    /// The point at parameter `t` along the normalised direction.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.normalize() * t
    }
}

/// The first non-empty cell struck by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// The struck cell.
    pub cell: Point3<i32>,
    /// The id stored in the struck cell.
    pub block: BlockId,
    /// Where the ray entered the cell.
    pub enter_point: Point3<f32>,
    /// The face the ray entered through. `None` when the ray started inside
    /// the cell.
    pub face: Option<BlockSide>,
    /// Distance from the origin to `enter_point`.
    pub distance: f32,
}

impl RayHit {
    /// Outward normal of the entered face, or zero when the ray started inside
    /// the cell.
    pub fn face_normal(&self) -> Vector3<i32> {
        self.face
            .map(BlockSide::normal)
            .unwrap_or(Vector3::new(0, 0, 0))
    }

    /// The empty cell the ray passed through just before the hit.
    pub fn adjacent_cell(&self) -> Option<Point3<i32>> {
        self.face.map(|side| side.neighbour_of(self.cell))
    }
}

/// The cell containing `point`, or `None` if a coordinate is not finite or
/// its floor falls outside the `i32` range.
pub fn cell_of(point: Point3<f32>) -> Option<Point3<i32>> {
    let axis = |v: f32| {
        let floor = v.floor();
        // i32::MAX is not representable in f32; 2^31 is the first value past it.
        (floor >= i32::MIN as f32 && floor < -(i32::MIN as f32)).then_some(floor as i32)
    };
    Some(Point3::new(axis(point.x)?, axis(point.y)?, axis(point.z)?))
}

/// Casts `ray` through `store` and returns the first non-empty cell within
/// `max_distance`.
///
/// # Errors
/// - `BadArgument` if the direction has zero length or is not finite, or if
///   the origin lies outside the addressable cell range.
/// - `OutOfRange` if `max_distance` is not a positive finite number.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_sandbox::engine_state::voxels::{
///     block::BlockRegistry,
///     raycast::{raycast, Ray},
///     world::BlockStore,
/// };
///
/// let mut store = BlockStore::new(BlockRegistry::standard().into());
/// store.set_block(Point3::new(5, 0, 5), 3).unwrap();
///
/// let ray = Ray::new(Point3::new(5.5, 0.5, -10.0), Vector3::new(0.0, 0.0, 1.0));
/// let hit = raycast(&store, &ray, 100.0).unwrap().unwrap();
/// assert_eq!(hit.cell, Point3::new(5, 0, 5));
/// assert_eq!(hit.face_normal(), Vector3::new(0, 0, -1));
/// ```
pub fn raycast(store: &BlockStore, ray: &Ray, max_distance: f32) -> Result<Option<RayHit>> {
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(VoxelError::OutOfRange(format!(
            "max distance must be positive, got {max_distance}"
        )));
    }
    let length = ray.direction.magnitude();
    if !length.is_finite() || length == 0.0 {
        return Err(VoxelError::BadArgument(format!(
            "ray direction must be non-zero, got {:?}",
            ray.direction
        )));
    }
    let Some(start) = cell_of(ray.origin) else {
        return Err(VoxelError::BadArgument(format!(
            "ray origin must be finite and within the cell range, got {:?}",
            ray.origin
        )));
    };

    let direction = ray.direction / length;
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let dir = [direction.x, direction.y, direction.z];

    let mut cell = [start.x, start.y, start.z];

    let block = store.get_block(Point3::from(cell));
    if block != EMPTY {
        return Ok(Some(RayHit {
            cell: Point3::from(cell),
            block,
            enter_point: ray.origin,
            face: None,
            distance: 0.0,
        }));
    }

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        if dir[axis] > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / dir[axis];
            t_max[axis] = ((cell[axis] as f32 + 1.0) - origin[axis]) * t_delta[axis];
        } else if dir[axis] < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / dir[axis];
            t_max[axis] = (origin[axis] - cell[axis] as f32) * t_delta[axis];
        }
    }

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        let t = t_max[axis];
        if t > max_distance {
            return Ok(None);
        }

        // Leaving the coordinate space means nothing further can be hit.
        let Some(next) = cell[axis].checked_add(step[axis]) else {
            return Ok(None);
        };
        cell[axis] = next;
        t_max[axis] += t_delta[axis];

        let position = Point3::from(cell);
        let block = store.get_block(position);
        if block != EMPTY {
            return Ok(Some(RayHit {
                cell: position,
                block,
                enter_point: ray.origin + direction * t,
                face: Some(BlockSide::entered_by_step(axis, step[axis])),
                distance: t,
            }));
        }
    }
}
