//! Headless demo: a seeded autopilot plays the classic maze
//!
//! Usage: `maze-chase [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use maze_chase::LevelSettings;
    use maze_chase::consts::{PLAYER_TURN_THRESHOLD, SIM_DT};
    use maze_chase::sim::{
        Direction, FixedTimestep, GameEvent, GameState, MazeLayout, TickInput, tick,
    };
    use maze_chase::snap_to_tile;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Simulated seconds the demo runs for
    const DEMO_SECONDS: f32 = 180.0;
    /// Pretend the host renders at 60 Hz
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_SEED: u64 = 12345;

    /// Wanders the maze, picking a random open exit at each junction and
    /// preferring to keep going straight
    struct Autopilot {
        rng: Pcg32,
    }

    impl Autopilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            }
        }

        fn choose(&mut self, state: &GameState) -> Option<Direction> {
            let mover = &state.player.mover;
            if !mover.can_turn(PLAYER_TURN_THRESHOLD) {
                return None;
            }
            let here = snap_to_tile(mover.pos);
            let heading = mover.heading();
            let open: Vec<Direction> = Direction::STEERING_ORDER
                .into_iter()
                .filter(|d| Some(d.opposite()) != heading)
                .filter(|d| !state.grid.collides_with_wall(here + d.to_vec2(), false))
                .collect();

            if let Some(dir) = heading {
                if open.contains(&dir) && self.rng.random_bool(0.6) {
                    return Some(dir);
                }
            }
            match open.len() {
                0 => heading.map(Direction::opposite),
                n => Some(open[self.rng.random_range(0..n)]),
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => LevelSettings::load(path)?,
            None => LevelSettings::default(),
        };
        let seed = match args.next() {
            Some(s) => s.parse()?,
            None => DEFAULT_SEED,
        };

        let mut state = GameState::new(MazeLayout::classic(), settings, seed)?;
        let mut autopilot = Autopilot::new(seed);
        let mut clock = FixedTimestep::new();
        let frames = (DEMO_SECONDS / FRAME_DT) as u32;

        let mut captures = 0u32;
        let mut deaths = 0u32;
        'frames: for _ in 0..frames {
            for _ in 0..clock.advance(FRAME_DT) {
                let input = TickInput {
                    desired: autopilot.choose(&state),
                };
                tick(&mut state, &input, SIM_DT);

                for event in &state.events {
                    match event {
                        GameEvent::PursuerCaptured { index, points } => {
                            captures += 1;
                            log::debug!("captured pursuer {index} for {points}");
                        }
                        GameEvent::PlayerCaught => deaths += 1,
                        GameEvent::LevelCleared => log::info!("Level {} cleared", state.level),
                        _ => {}
                    }
                }

                if state.is_cleared() {
                    state.start_next_level();
                    clock.reset();
                }
                if state.is_game_over() {
                    break 'frames;
                }
            }
        }

        log::info!(
            "Demo finished after {:.1}s: level {}, score {}, lives {}, {} items left, {} captures, {} deaths",
            state.time_ticks as f32 * SIM_DT,
            state.level,
            state.score,
            state.lives,
            state.grid.remaining_items(),
            captures,
            deaths
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Maze Chase demo starting...");

    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless demo on the web; hosts embed the library directly
}
