//! Lane Rush entry point
//!
//! Headless demo driver: runs autopilot sessions at a fixed timestep and
//! reports the session leaderboard. A rendering host drives the same
//! `tick`/`snapshot` surface from its own frame callback instead.

use lane_rush::consts::{MAX_SUBSTEPS, SIM_DT};
use lane_rush::highscores::{HighScoreEntry, HighScores};
use lane_rush::sim::{GamePhase, GameState, TickInput, tick};
use lane_rush::tuning::Tuning;

/// Stop a run that somehow never crashes (10 simulated minutes)
const MAX_TICKS: u64 = 10 * 60 * 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: lane-rush [seed] [runs] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 0xCA12,
    };
    let runs: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 5,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("Lane Rush demo: {runs} autopilot run(s) from seed {seed}");

    let mut board = HighScores::new();
    for i in 0..runs {
        let mut state = GameState::new(seed.wrapping_add(i), tuning.clone())?;
        state.restart();
        run_session(&mut state);

        log::info!(
            "Run {} over: score {}, avoided {}, level {}, {} ticks",
            i + 1,
            state.stats.score,
            state.stats.obstacles_avoided,
            state.difficulty.level,
            state.time_ticks
        );
        board.add_run(HighScoreEntry {
            score: state.stats.score,
            obstacles_avoided: state.stats.obstacles_avoided,
            level: state.difficulty.level,
            seed: state.seed,
        });
    }

    println!("\nLeaderboard:");
    for (rank, entry) in board.entries.iter().enumerate() {
        println!(
            "{:>2}. {:>8} pts  avoided {:>4}  level {:>2}  seed {}",
            rank + 1,
            entry.score,
            entry.obstacles_avoided,
            entry.level,
            entry.seed
        );
    }
    println!("\n{}", serde_json::to_string_pretty(&board)?);

    Ok(())
}

/// Drive one session to its end with the accumulator pattern a real host
/// would use. Each loop iteration stands in for one display frame.
fn run_session(state: &mut GameState) {
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut accumulator = 0.0f32;
    while state.phase == GamePhase::Playing && state.time_ticks < MAX_TICKS {
        accumulator += SIM_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}
