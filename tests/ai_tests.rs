use std::collections::HashSet;

use battleships::ai::{choose_target, fire, record_result};
use battleships::{AiMemory, Board, Difficulty, EngineError, ShipId, ShotResult, Tile};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

/// Board with every cell shot except `open`.
fn exhausted_but(grid_size: usize, open: (usize, usize)) -> Board {
    let mut board = Board::new(grid_size).unwrap();
    for r in 0..grid_size {
        for c in 0..grid_size {
            if (r, c) != open {
                board.shoot(r, c).unwrap();
            }
        }
    }
    board
}

#[test]
fn test_hard_opening_shot_uses_checkerboard() {
    let board = Board::new(8).unwrap();
    let mut seen = HashSet::new();
    for seed in 0..200 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut memory = AiMemory::new();
        let (r, c) = choose_target(&board, Difficulty::Hard, &mut memory, &mut rng).unwrap();
        assert_eq!((r + c) % 2, 0, "seed {} picked ({}, {})", seed, r, c);
        seen.insert((r, c));
    }
    assert!(seen.len() > 10);
}

#[test]
fn test_easy_and_medium_cover_both_parities() {
    let board = Board::new(8).unwrap();
    for difficulty in [Difficulty::Easy, Difficulty::Medium] {
        let mut odd = 0;
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut memory = AiMemory::new();
            let (r, c) = choose_target(&board, difficulty, &mut memory, &mut rng).unwrap();
            odd += (r + c) % 2;
        }
        assert!(odd > 0 && odd < 200);
    }
}

#[test]
fn test_last_open_cell_is_chosen_by_every_difficulty() {
    for open in [(1, 2), (0, 0), (3, 3)] {
        let board = exhausted_but(4, open);
        for difficulty in ALL {
            for seed in 0..5 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let mut memory = AiMemory::new();
                let cell = choose_target(&board, difficulty, &mut memory, &mut rng).unwrap();
                assert_eq!(cell, open);
            }
        }
    }
}

#[test]
fn test_no_valid_cells() {
    let mut board = exhausted_but(3, (2, 2));
    board.shoot(2, 2).unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    for difficulty in ALL {
        let mut memory = AiMemory::new();
        assert_eq!(
            choose_target(&board, difficulty, &mut memory, &mut rng),
            Err(EngineError::NoValidCells)
        );
    }
}

#[test]
fn test_easy_never_touches_memory() {
    let board = Board::new(5).unwrap();
    let mut memory = AiMemory::new();
    record_result(&board, Difficulty::Easy, &mut memory, (2, 2), true);
    record_result(&board, Difficulty::Easy, &mut memory, (0, 0), false);
    assert_eq!(memory, AiMemory::new());
}

#[test]
fn test_hit_queues_neighbors() {
    let board = Board::new(4).unwrap();
    for difficulty in [Difficulty::Medium, Difficulty::Hard] {
        let mut memory = AiMemory::new();
        record_result(&board, difficulty, &mut memory, (0, 0), true);
        assert!(memory.is_hunting());
        assert_eq!(memory.last_hit(), Some((0, 0)));
        assert_eq!(memory.queue().copied().collect::<Vec<_>>(), vec![(1, 0), (0, 1)]);

        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            choose_target(&board, difficulty, &mut memory, &mut rng).unwrap(),
            (1, 0)
        );
        assert_eq!(memory.queue_len(), 1);
    }
}

#[test]
fn test_miss_without_queue_leaves_hunt_off() {
    let board = Board::new(4).unwrap();
    let mut memory = AiMemory::new();
    record_result(&board, Difficulty::Medium, &mut memory, (2, 2), false);
    assert_eq!(memory, AiMemory::new());
}

#[test]
fn test_queue_skips_cells_already_shot() {
    let mut board = Board::new(4).unwrap();
    let mut memory = AiMemory::new();
    record_result(&board, Difficulty::Hard, &mut memory, (1, 1), true);
    board.shoot(0, 1).unwrap();

    let mut rng = SmallRng::seed_from_u64(9);
    assert_eq!(
        choose_target(&board, Difficulty::Hard, &mut memory, &mut rng).unwrap(),
        (2, 1)
    );
    assert_eq!(memory.queue().copied().collect::<Vec<_>>(), vec![(1, 0), (1, 2)]);
}

#[test]
fn test_hunt_ends_when_queue_drains() {
    let mut board = Board::new(3).unwrap();
    let mut memory = AiMemory::new();
    let mut rng = SmallRng::seed_from_u64(5);
    record_result(&board, Difficulty::Medium, &mut memory, (0, 0), true);
    board.shoot(0, 0).unwrap();

    for _ in 0..2 {
        let cell = choose_target(&board, Difficulty::Medium, &mut memory, &mut rng).unwrap();
        let hit = board.shoot(cell.0, cell.1).unwrap().is_hit();
        record_result(&board, Difficulty::Medium, &mut memory, cell, hit);
    }
    assert!(!memory.is_hunting());
    assert_eq!(memory.last_hit(), None);
    assert_eq!(memory.queue_len(), 0);
}

#[test]
fn test_fire_follows_up_on_a_hit() {
    let mut board = Board::new(3).unwrap();
    for r in 0..3 {
        for c in 0..3 {
            board.set_tile(r, c, Tile::ship(ShipId(1)));
        }
    }
    let mut memory = AiMemory::new();
    let mut rng = SmallRng::seed_from_u64(11);
    let (first, result) = fire(&mut board, Difficulty::Medium, &mut memory, &mut rng).unwrap();
    assert_eq!(result, ShotResult::Hit(ShipId(1)));
    assert_eq!(board.tile_at(first.0, first.1).unwrap(), Tile::Hit);

    let expected = board.neighbors(first.0, first.1);
    let (second, _) = fire(&mut board, Difficulty::Medium, &mut memory, &mut rng).unwrap();
    assert_eq!(second, expected[0]);
}

#[test]
fn test_difficulty_parse_and_display() {
    assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
    assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert!("impossible".parse::<Difficulty>().is_err());
    assert_eq!(Difficulty::Hard.to_string(), "hard");
}
