use battleships::{
    init_logging, AiPlayer, Difficulty, GameEngine, GameStatus, MatchSettings, Player,
    DEFAULT_GRID_SIZE,
};
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Play one headless match: an Easy computer stands in for the human side.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = Difficulty::Hard)]
    difficulty: Difficulty,
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let (mut game_rng, mut human_rng) = match args.seed {
        Some(s) => (
            SmallRng::seed_from_u64(s),
            SmallRng::seed_from_u64(s.wrapping_add(1)),
        ),
        None => {
            let mut seed_rng = rand::rng();
            (
                SmallRng::from_rng(&mut seed_rng),
                SmallRng::from_rng(&mut seed_rng),
            )
        }
    };

    let settings = MatchSettings::new(args.grid_size, args.difficulty);
    let mut game = GameEngine::standard(settings, &mut game_rng)?;
    let mut human = AiPlayer::new(Difficulty::Easy);
    human.place_ships(&mut human_rng, game.planning()?)?;
    game.start_combat()?;

    let mut player_shots = 0usize;
    let mut opponent_shots = 0usize;
    while game.status() == GameStatus::InProgress {
        let cell = human.select_target(&mut human_rng, game.opponent_board())?;
        let outcome = game.player_fire(cell.0, cell.1)?;
        human.handle_shot_result(game.opponent_board(), cell, outcome);
        player_shots += 1;
        if game.status() != GameStatus::InProgress {
            break;
        }
        game.opponent_fire(&mut game_rng)?;
        opponent_shots += 1;
    }

    let winner = match game.status() {
        GameStatus::Won => Some("player"),
        GameStatus::Lost => Some("opponent"),
        GameStatus::InProgress => None,
    };
    let result = json!({
        "winner": winner,
        "turns": player_shots.max(opponent_shots),
        "player_shots": player_shots,
        "opponent_shots": opponent_shots,
        "difficulty": args.difficulty.to_string(),
        "grid_size": args.grid_size,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
