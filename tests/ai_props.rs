use battleships::ai::{choose_target, fire};
use battleships::{AiMemory, Difficulty, EngineError, Fleet, PlacementEngine};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_targets_a_shot_cell(seed in any::<u64>(), difficulty in difficulty(), shots in 0usize..100) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = PlacementEngine::new(10, Fleet::standard()).unwrap();
        engine.deploy_randomly(&mut rng).unwrap();
        for _ in 0..shots {
            let r = rng.random_range(0..10);
            let c = rng.random_range(0..10);
            let _ = engine.receive_shot(r, c);
        }
        let board = engine.board();
        let mut memory = AiMemory::new();
        match choose_target(board, difficulty, &mut memory, &mut rng) {
            Ok((r, c)) => prop_assert!(!board.tile_at(r, c).unwrap().is_shot()),
            Err(e) => {
                prop_assert_eq!(e, EngineError::NoValidCells);
                prop_assert!(board.candidates().is_empty());
            }
        }
    }

    #[test]
    fn full_game_fires_each_cell_once(seed in any::<u64>(), difficulty in difficulty()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = PlacementEngine::new(8, Fleet::standard()).unwrap();
        engine.deploy_randomly(&mut rng).unwrap();
        let mut board = engine.board().clone();
        let mut memory = AiMemory::new();

        let mut shots = 0;
        while fire(&mut board, difficulty, &mut memory, &mut rng).is_ok() {
            shots += 1;
            if difficulty == Difficulty::Easy {
                prop_assert_eq!(&memory, &AiMemory::new());
            }
        }
        prop_assert_eq!(shots, 64);
        prop_assert!(board.candidates().is_empty());
        prop_assert!(board.is_defeated());
    }
}
