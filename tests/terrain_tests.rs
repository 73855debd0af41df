/// Integration tests for terrain generation
/// These tests validate determinism, footprint coverage and column layering
use std::{collections::HashSet, rc::Rc};

use cgmath::Point3;
use voxel_sandbox::engine_state::voxels::{
    block::{block_type::BlockKind, BlockId, BlockRegistry, EMPTY},
    terrain::{
        TerrainGenerator, TerrainParams, DIRT_DEPTH, FLOOR_HEIGHT, FOLIAGE_RADIUS,
        TRUNK_BASE_HEIGHT,
    },
    world::BlockStore,
};
use voxel_sandbox::VoxelError;

fn generate(params: TerrainParams) -> (TerrainGenerator, BlockStore) {
    let generator = TerrainGenerator::new(params).unwrap();
    let mut store = BlockStore::new(Rc::new(BlockRegistry::standard()));
    generator.generate(&mut store).unwrap();
    (generator, store)
}

fn sorted_support(store: &BlockStore) -> Vec<([i32; 3], BlockId)> {
    let mut support: Vec<_> = store
        .support()
        .map(|(cell, id)| ([cell.x, cell.y, cell.z], id))
        .collect();
    support.sort_unstable();
    support
}

#[test]
fn same_seed_same_world() {
    let params = TerrainParams {
        width: 4,
        depth: 4,
        max_height: 10,
        seed: 1234,
    };
    let (_, first) = generate(params);
    let (_, second) = generate(params);
    assert!(!first.is_empty());
    assert_eq!(sorted_support(&first), sorted_support(&second));
}

#[test]
fn larger_worlds_are_deterministic_with_trees() {
    let params = TerrainParams {
        width: 40,
        depth: 40,
        max_height: 24,
        seed: 99,
    };
    let (_, first) = generate(params);
    let (_, second) = generate(params);
    assert_eq!(sorted_support(&first), sorted_support(&second));
}

#[test]
fn every_column_is_layered_from_the_top() {
    let (generator, store) = generate(TerrainParams {
        width: 24,
        depth: 20,
        max_height: 30,
        seed: 5,
    });

    for x in generator.x_range() {
        for z in generator.z_range() {
            let surface = generator.height_at(x, z);
            assert!((FLOOR_HEIGHT..30).contains(&surface));

            for depth in 0..=surface {
                let expected = match depth {
                    0 => BlockKind::GRASS.id(),
                    d if d <= DIRT_DEPTH => BlockKind::DIRT.id(),
                    _ => BlockKind::STONE.id(),
                };
                assert_eq!(
                    store.get_block(Point3::new(x, surface - depth, z)),
                    expected,
                    "column ({x}, {z}) at depth {depth}"
                );
            }
            assert_eq!(store.get_block(Point3::new(x, -1, z)), EMPTY);
        }
    }
}

#[test]
fn footprint_is_centred_on_the_origin() {
    let (generator, store) = generate(TerrainParams {
        width: 6,
        depth: 6,
        max_height: 12,
        seed: 0,
    });
    assert_eq!(generator.x_range(), -3..3);

    for x in -3..3 {
        for z in -3..3 {
            assert_ne!(store.get_block(Point3::new(x, 0, z)), EMPTY);
        }
    }
    assert_eq!(store.get_block(Point3::new(3, 0, 0)), EMPTY);
    assert_eq!(store.get_block(Point3::new(0, 0, -4)), EMPTY);
}

#[test]
fn trees_have_wood_trunks_topped_by_leaves() {
    let (generator, store) = generate(TerrainParams {
        width: 64,
        depth: 64,
        max_height: 20,
        seed: 3,
    });

    let mut trunks = 0;
    for x in generator.x_range() {
        for z in generator.z_range() {
            let root = Point3::new(x, generator.height_at(x, z) + 1, z);
            if store.get_block(root) != BlockKind::WOOD.id() {
                continue;
            }
            trunks += 1;
            let mut top = root;
            while store.get_block(top + cgmath::Vector3::new(0, 1, 0)) == BlockKind::WOOD.id() {
                top.y += 1;
            }
            assert_eq!(
                store.get_block(top + cgmath::Vector3::new(0, 1, 0)),
                BlockKind::LEAVES.id()
            );
        }
    }
    assert!(trunks > 0, "a 64x64 world should grow at least one tree");
}

#[test]
fn cells_above_the_terrain_are_exactly_the_planted_trees() {
    let (generator, store) = generate(TerrainParams {
        width: 48,
        depth: 40,
        max_height: 22,
        seed: 31,
    });
    let sites = generator.tree_sites();
    assert!(!sites.is_empty());

    let is_terrain = |cell: &Point3<i32>| {
        generator.x_range().contains(&cell.x)
            && generator.z_range().contains(&cell.z)
            && (0..=generator.height_at(cell.x, cell.z)).contains(&cell.y)
    };

    let mut planted = HashSet::new();
    for site in &sites {
        let trunk: Vec<_> = site.trunk().collect();
        assert!(
            trunk.len() == TRUNK_BASE_HEIGHT as usize || trunk.len() == TRUNK_BASE_HEIGHT as usize + 1,
            "trunk of {} cells at {:?}",
            trunk.len(),
            site.root
        );
        // An earlier tree's foliage may already occupy trunk cells.
        assert!(trunk.iter().all(|cell| store.get_block(*cell) != EMPTY));

        for cell in trunk.into_iter().chain(site.foliage()) {
            if !is_terrain(&cell) {
                planted.insert([cell.x, cell.y, cell.z]);
            }
        }
    }

    let above_terrain: HashSet<_> = store
        .support()
        .filter(|(cell, _)| !is_terrain(cell))
        .map(|(cell, id)| {
            assert!(
                id == BlockKind::WOOD.id() || id == BlockKind::LEAVES.id(),
                "{id} at {cell:?}"
            );
            [cell.x, cell.y, cell.z]
        })
        .collect();
    assert_eq!(above_terrain, planted);
}

#[test]
fn only_foliage_spills_past_the_footprint() {
    let params = TerrainParams {
        width: 64,
        depth: 64,
        max_height: 20,
        seed: 12,
    };
    let (generator, store) = generate(params);
    let x_range = generator.x_range();
    let z_range = generator.z_range();

    let mut outside = 0;
    for (cell, id) in store.support() {
        if x_range.contains(&cell.x) && z_range.contains(&cell.z) {
            continue;
        }
        outside += 1;
        assert_eq!(id, BlockKind::LEAVES.id(), "{cell:?} outside the footprint");
        assert!(cell.x >= x_range.start - FOLIAGE_RADIUS && cell.x < x_range.end + FOLIAGE_RADIUS);
        assert!(cell.z >= z_range.start - FOLIAGE_RADIUS && cell.z < z_range.end + FOLIAGE_RADIUS);
    }

    let edge_trees = generator
        .tree_sites()
        .iter()
        .filter(|site| {
            site.root.x < x_range.start + FOLIAGE_RADIUS
                || site.root.x >= x_range.end - FOLIAGE_RADIUS
                || site.root.z < z_range.start + FOLIAGE_RADIUS
                || site.root.z >= z_range.end - FOLIAGE_RADIUS
        })
        .count();
    assert_eq!(outside > 0, edge_trees > 0);
}

#[test]
fn invalid_parameters_are_rejected() {
    let bad = [
        TerrainParams {
            width: 0,
            ..TerrainParams::default()
        },
        TerrainParams {
            depth: -4,
            ..TerrainParams::default()
        },
        TerrainParams {
            max_height: -1,
            ..TerrainParams::default()
        },
    ];
    for params in bad {
        assert!(matches!(
            TerrainGenerator::new(params),
            Err(VoxelError::BadArgument(_))
        ));
    }
}
