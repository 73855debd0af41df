/// Integration tests for voxel raycasting
/// These tests validate picking against a brute-force segment/box intersection
use std::rc::Rc;

use cgmath::{InnerSpace, Point3, Vector3};
use voxel_sandbox::engine_state::voxels::{
    block::{block_side::BlockSide, BlockRegistry, EMPTY},
    raycast::{raycast, Ray},
    world::BlockStore,
};
use voxel_sandbox::VoxelError;

const EPSILON: f32 = 1e-3;

fn store_with(cells: &[Point3<i32>]) -> BlockStore {
    let mut store = BlockStore::new(Rc::new(BlockRegistry::standard()));
    for cell in cells {
        store.set_block(*cell, 3).unwrap();
    }
    store
}

/// Parameter interval over which the ray lies inside the unit box of `cell`.
fn box_interval(origin: Point3<f32>, direction: Vector3<f32>, cell: Point3<i32>) -> Option<(f32, f32)> {
    let origin = [origin.x, origin.y, origin.z];
    let direction = [direction.x, direction.y, direction.z];
    let min = [cell.x as f32, cell.y as f32, cell.z as f32];

    let mut enter = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    for axis in 0..3 {
        if direction[axis] == 0.0 {
            if origin[axis] < min[axis] || origin[axis] > min[axis] + 1.0 {
                return None;
            }
            continue;
        }
        let a = (min[axis] - origin[axis]) / direction[axis];
        let b = (min[axis] + 1.0 - origin[axis]) / direction[axis];
        enter = enter.max(a.min(b));
        exit = exit.min(a.max(b));
    }
    (enter <= exit).then_some((enter, exit))
}

/// The earliest clearly intersected cell, ignoring grazing contacts.
fn brute_force_entry(cells: &[Point3<i32>], ray: &Ray, max_distance: f32) -> Option<f32> {
    let direction = ray.direction.normalize();
    cells
        .iter()
        .filter_map(|cell| box_interval(ray.origin, direction, *cell))
        .filter(|(enter, exit)| {
            let enter = enter.max(0.0);
            let exit = exit.min(max_distance);
            exit - enter > EPSILON
        })
        .map(|(enter, _)| enter.max(0.0))
        .reduce(f32::min)
}

#[test]
fn raycast_at_a_single_cube() {
    let store = store_with(&[Point3::new(5, 0, 5)]);
    let ray = Ray::new(Point3::new(5.5, 0.5, -10.0), Vector3::new(0.0, 0.0, 1.0));
    let hit = raycast(&store, &ray, 100.0).unwrap().unwrap();

    assert_eq!(hit.cell, Point3::new(5, 0, 5));
    assert_eq!(hit.block, 3);
    assert_eq!(hit.face, Some(BlockSide::BACK));
    assert_eq!(hit.face_normal(), Vector3::new(0, 0, -1));
    // The near face sits at z = 5, fifteen units from the origin.
    assert!((hit.distance - 15.0).abs() < EPSILON);
    assert!((hit.enter_point.z - 5.0).abs() < EPSILON);
    assert_eq!(hit.adjacent_cell(), Some(Point3::new(5, 0, 4)));
}

#[test]
fn raycast_miss() {
    let store = store_with(&[Point3::new(5, 0, 5)]);
    let ray = Ray::new(Point3::new(0.5, 0.5, -10.0), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(raycast(&store, &ray, 100.0).unwrap(), None);
}

#[test]
fn hits_beyond_max_distance_are_misses() {
    let store = store_with(&[Point3::new(0, 0, 20)]);
    let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(raycast(&store, &ray, 10.0).unwrap(), None);
    assert!(raycast(&store, &ray, 30.0).unwrap().is_some());
}

#[test]
fn unnormalised_directions_are_accepted() {
    let store = store_with(&[Point3::new(0, -3, 0)]);
    let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, -7.0, 0.0));
    let hit = raycast(&store, &ray, 100.0).unwrap().unwrap();
    assert_eq!(hit.face_normal(), Vector3::new(0, 1, 0));
    assert!((hit.distance - 2.5).abs() < EPSILON);
}

#[test]
fn invalid_arguments_are_rejected() {
    let store = store_with(&[]);
    let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    for max_distance in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            raycast(&store, &ray, max_distance),
            Err(VoxelError::OutOfRange(_))
        ));
    }

    let zero = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
    assert!(matches!(
        raycast(&store, &zero, 10.0),
        Err(VoxelError::BadArgument(_))
    ));
}

#[test]
fn random_rays_agree_with_brute_force() {
    let mut rng = fastrand::Rng::with_seed(7);
    let max_distance = 40.0;

    for _ in 0..40 {
        let cells: Vec<_> = (0..30)
            .map(|_| Point3::new(rng.i32(-12..12), rng.i32(-12..12), rng.i32(-12..12)))
            .collect();
        let store = store_with(&cells);

        for _ in 0..50 {
            let origin = Point3::new(
                rng.f32() * 30.0 - 15.0,
                rng.f32() * 30.0 - 15.0,
                rng.f32() * 30.0 - 15.0,
            );
            let direction = Vector3::new(rng.f32() - 0.5, rng.f32() - 0.5, rng.f32() - 0.5);
            if direction.magnitude() < 0.05 {
                continue;
            }
            let ray = Ray::new(origin, direction);
            let hit = raycast(&store, &ray, max_distance).unwrap();
            let expected = brute_force_entry(&cells, &ray, max_distance);

            match (hit, expected) {
                (Some(hit), Some(enter)) => {
                    // Soundness: the cell is occupied and nothing clearly
                    // intersected comes before it.
                    assert_ne!(store.get_block(hit.cell), EMPTY);
                    assert!(hit.distance <= enter + EPSILON, "{ray:?} skipped a cell");
                    if let Some((cell_enter, _)) =
                        box_interval(ray.origin, ray.direction.normalize(), hit.cell)
                    {
                        assert!((cell_enter.max(0.0) - hit.distance).abs() < 1e-2);
                    }
                }
                (None, Some(enter)) => panic!("{ray:?} missed a cell entered at {enter}"),
                (Some(hit), None) => {
                    // Only grazing contacts may be reported without a clear entry.
                    assert_ne!(store.get_block(hit.cell), EMPTY);
                    assert!(hit.distance <= max_distance);
                }
                (None, None) => {}
            }
        }
    }
}

#[test]
fn hit_face_points_back_towards_the_origin() {
    let mut rng = fastrand::Rng::with_seed(11);
    let store = store_with(&[Point3::new(0, 0, 0)]);

    for _ in 0..200 {
        let origin = Point3::new(
            rng.f32() * 20.0 - 10.0,
            rng.f32() * 20.0 - 10.0,
            rng.f32() * 20.0 - 10.0,
        );
        let target = Point3::new(rng.f32(), rng.f32(), rng.f32());
        let ray = Ray::new(origin, target - origin);
        let Some(hit) = raycast(&store, &ray, 100.0).unwrap() else {
            continue;
        };
        let Some(adjacent) = hit.adjacent_cell() else {
            continue;
        };
        assert_eq!(store.get_block(adjacent), EMPTY);
        let normal = hit.face_normal();
        let direction = ray.direction.normalize();
        let dot = normal.x as f32 * direction.x
            + normal.y as f32 * direction.y
            + normal.z as f32 * direction.z;
        assert!(dot <= 0.0, "face {normal:?} faces away from {direction:?}");
    }
}
