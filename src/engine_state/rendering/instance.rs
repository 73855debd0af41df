//! Per-instance data for batched cube rendering.
//!
//! Every visible cell becomes one [`Instance`] in the batch of its block id. The
//! external renderer draws a unit cube once per instance, translated to the
//! instance position.

use cgmath::Point3;

/// One cube instance in a batched draw.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), the centre of the cell in world space
///
/// Total size: 12 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    /// Cell centre in world space
    pub position: [f32; 3],
}

impl Instance {
    /// Creates the instance for the unit cell whose minimum corner is `cell`.
    pub fn for_cell(cell: Point3<i32>) -> Self {
        Instance {
            position: [
                cell.x as f32 + 0.5,
                cell.y as f32 + 0.5,
                cell.z as f32 + 0.5,
            ],
        }
    }
}
