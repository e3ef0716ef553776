use battleships::{Fleet, Location, Orientation, PlacementEngine, ShipId, Tile};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

const GRID: usize = 8;

/// Standard fleet on an 8x8 board with a random subset of ships deployed.
fn partly_deployed(seed: u64) -> PlacementEngine {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut engine = PlacementEngine::new(GRID, Fleet::standard()).unwrap();
    engine.deploy_randomly(&mut rng).unwrap();
    let ids: Vec<ShipId> = engine.fleet().catalog().iter().map(|s| s.id).collect();
    for id in ids {
        if rng.random_bool(0.4) {
            engine.remove_from_board(Some(id)).unwrap();
        }
    }
    engine
}

fn orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn ship_tiles(engine: &PlacementEngine, id: ShipId) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for r in 0..GRID {
        for c in 0..GRID {
            if engine.board().tile_at(r, c).unwrap().ship_id() == Some(id) {
                out.push((r, c));
            }
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn place_or_move_is_all_or_nothing(
        seed in any::<u64>(),
        idx in 0usize..5,
        row in 0..GRID,
        col in 0..GRID,
        rotation in orientation(),
    ) {
        let mut engine = partly_deployed(seed);
        let id = engine.fleet().catalog()[idx].id;
        let size = engine.fleet().catalog()[idx].size;
        let before = engine.clone();

        match engine.place_or_move(id, row, col, rotation) {
            Ok(()) => {
                let mut expected = engine.board().footprint(row, col, size, rotation);
                expected.sort();
                prop_assert_eq!(ship_tiles(&engine, id), expected);
                let placed = engine.fleet().placement(id).unwrap();
                prop_assert_eq!((placed.row, placed.col, placed.rotation), (row, col, rotation));
                prop_assert_eq!(engine.fleet().location(id), Some(Location::Placed));
                for other in before.fleet().placed().iter().filter(|s| s.id != id) {
                    prop_assert_eq!(ship_tiles(&engine, other.id), ship_tiles(&before, other.id));
                }
            }
            Err(_) => prop_assert_eq!(&engine, &before),
        }
    }

    #[test]
    fn rotate_twice_restores_footprint(seed in any::<u64>(), idx in 0usize..5) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = PlacementEngine::new(10, Fleet::standard()).unwrap();
        engine.deploy_randomly(&mut rng).unwrap();
        let id = engine.fleet().catalog()[idx].id;
        let before = engine.clone();

        if engine.rotate(Some(id)).is_ok() {
            prop_assert_ne!(engine.fleet().placement(id), before.fleet().placement(id));
            prop_assert!(engine.rotate(Some(id)).is_ok());
        }
        prop_assert_eq!(&engine, &before);
    }

    #[test]
    fn clear_then_restore_keeps_each_ship_in_one_place(seed in any::<u64>()) {
        let mut engine = partly_deployed(seed);
        engine.clear_board();
        let pool = engine.restore_available();

        let catalog = engine.fleet().catalog().to_vec();
        prop_assert_eq!(pool, catalog.len());
        prop_assert!(engine.fleet().placed().is_empty());
        let mut ids: Vec<ShipId> = engine.fleet().available().iter().map(|a| a.spec.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), catalog.len());
        for spec in &catalog {
            prop_assert_eq!(engine.fleet().location(spec.id), Some(Location::Available));
        }
        for r in 0..GRID {
            for c in 0..GRID {
                prop_assert_eq!(engine.board().tile_at(r, c).unwrap(), Tile::Empty);
            }
        }
    }
}
