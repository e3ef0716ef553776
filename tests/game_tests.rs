use battleships::{
    AiPlayer, Difficulty, EngineError, GameEngine, GameStatus, MatchSettings, Orientation, Phase,
    Player, ShipSpec, ShotOutcome, Side, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn planned_game(seed: u64, difficulty: Difficulty) -> (GameEngine, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = GameEngine::standard(MatchSettings::new(10, difficulty), &mut rng).unwrap();
    game.planning().unwrap().deploy_randomly(&mut rng).unwrap();
    (game, rng)
}

#[test]
fn test_new_match_deploys_opponent() {
    let mut rng = SmallRng::seed_from_u64(1);
    let game = GameEngine::standard(MatchSettings::default(), &mut rng).unwrap();
    assert_eq!(game.phase(), Phase::Planning);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.opponent().fleet().is_ready());
    assert_eq!(game.opponent_board().ships_remaining(), TOTAL_SHIP_CELLS);
    assert!(game.player().fleet().placed().is_empty());
    assert_eq!(game.settings().grid_size, 10);
    assert_eq!(game.settings().difficulty, Difficulty::Medium);
}

#[test]
fn test_settings_validated() {
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(
        GameEngine::standard(MatchSettings::new(4, Difficulty::Easy), &mut rng).unwrap_err(),
        EngineError::InvalidGridSize(4)
    );
    assert_eq!(
        GameEngine::standard(MatchSettings::new(0, Difficulty::Easy), &mut rng).unwrap_err(),
        EngineError::InvalidGridSize(0)
    );
    let catalog = vec![ShipSpec::new(1, "Sloop", 2, "#000000")];
    let game = GameEngine::new(MatchSettings::new(3, Difficulty::Hard), catalog, &mut rng).unwrap();
    assert_eq!(game.opponent_board().ships_remaining(), 2);
}

#[test]
fn test_combat_requires_full_fleet() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut game = GameEngine::standard(MatchSettings::default(), &mut rng).unwrap();
    assert_eq!(game.player_fire(0, 0), Err(EngineError::WrongPhase));
    assert_eq!(game.start_combat(), Err(EngineError::FleetIncomplete));

    let planning = game.planning().unwrap();
    planning
        .place_or_move(battleships::ShipId(1), 0, 0, Orientation::Horizontal)
        .unwrap();
    assert_eq!(game.start_combat(), Err(EngineError::FleetIncomplete));
    assert_eq!(game.phase(), Phase::Planning);
}

#[test]
fn test_start_combat_drops_selection() {
    let (mut game, _) = planned_game(3, Difficulty::Easy);
    let ship = game.player().fleet().placed()[0];
    game.planning().unwrap().select_placed(ship.row, ship.col).unwrap();
    assert!(game.player().fleet().active_id().is_some());

    game.start_combat().unwrap();
    assert_eq!(game.phase(), Phase::Combat);
    assert_eq!(game.player().fleet().active_id(), None);
    assert!(game.player().fleet().is_ready());
    assert!(matches!(game.planning(), Err(EngineError::WrongPhase)));
    assert_eq!(game.start_combat(), Err(EngineError::WrongPhase));
}

#[test]
fn test_turns_alternate() {
    let (mut game, mut rng) = planned_game(4, Difficulty::Hard);
    game.start_combat().unwrap();
    assert_eq!(game.next_to_fire(), Side::Player);
    assert_eq!(game.opponent_fire(&mut rng), Err(EngineError::WrongPhase));

    game.player_fire(0, 0).unwrap();
    assert_eq!(game.next_to_fire(), Side::Opponent);
    assert_eq!(game.player_fire(0, 1), Err(EngineError::WrongPhase));

    let (cell, _) = game.opponent_fire(&mut rng).unwrap();
    assert!(game.player().board().tile_at(cell.0, cell.1).unwrap().is_shot());
    assert_eq!(game.next_to_fire(), Side::Player);

    // a repeated shot is refused and the turn stays
    assert_eq!(
        game.player_fire(0, 0),
        Err(EngineError::AlreadyShot { row: 0, col: 0 })
    );
    assert_eq!(game.next_to_fire(), Side::Player);
}

#[test]
fn test_player_sinks_a_ship() {
    let (mut game, mut rng) = planned_game(5, Difficulty::Easy);
    game.start_combat().unwrap();
    let target = game
        .opponent()
        .fleet()
        .placed()
        .into_iter()
        .min_by_key(|s| s.size)
        .unwrap();

    let cells = target.footprint();
    let last = cells.len() - 1;
    for (i, (r, c)) in cells.into_iter().enumerate() {
        let outcome = game.player_fire(r, c).unwrap();
        if i == last {
            assert_eq!(outcome, ShotOutcome::Sunk(target.id));
        } else {
            assert_eq!(outcome, ShotOutcome::Hit(target.id));
        }
        game.opponent_fire(&mut rng).unwrap();
    }
    assert!(game.opponent().is_sunk(target.id));
}

#[test]
fn test_match_plays_to_a_finish() {
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let (mut game, mut rng) = planned_game(6, difficulty);
        game.start_combat().unwrap();
        let mut human = AiPlayer::new(Difficulty::Easy);

        let mut shots = 0;
        while game.status() == GameStatus::InProgress {
            let cell = human.select_target(&mut rng, game.opponent_board()).unwrap();
            let outcome = game.player_fire(cell.0, cell.1).unwrap();
            human.handle_shot_result(game.opponent_board(), cell, outcome);
            shots += 1;
            if game.status() == GameStatus::InProgress {
                game.opponent_fire(&mut rng).unwrap();
            }
        }
        assert!(shots >= TOTAL_SHIP_CELLS && shots <= 100);
        assert_eq!(game.phase(), Phase::Finished);
        match game.status() {
            GameStatus::Won => assert!(game.opponent().is_defeated()),
            GameStatus::Lost => assert!(game.player().is_defeated()),
            GameStatus::InProgress => unreachable!(),
        }
        assert_eq!(game.player_fire(0, 0), Err(EngineError::WrongPhase));
        assert_eq!(game.opponent_fire(&mut rng), Err(EngineError::WrongPhase));
    }
}
