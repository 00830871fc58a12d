//! Game state and core simulation types
//!
//! Everything one level needs lives here: the grid, the actors, the
//! director, score and lives, and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::ModeDirector;
use super::grid::{Grid, GridError};
use super::layout::MazeLayout;
use super::motion::Direction;
use super::player::Player;
use super::pursuer::Pursuer;
use super::tick::{TickInput, tick};
use crate::settings::LevelSettings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (including the start countdown)
    Playing,
    /// Player was caught; the death animation is running
    Dying { elapsed: f32 },
    /// Every item eaten; waiting for `start_next_level`
    Cleared,
    /// No lives left
    GameOver,
}

/// Things that happened during the last tick, for audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PelletEaten,
    PowerPelletEaten,
    PursuerCaptured { index: usize, points: u64 },
    PlayerCaught,
    LevelCleared,
    GameOver,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Fright target rolls
    pub(crate) rng: Pcg32,
    pub settings: LevelSettings,
    pub layout: MazeLayout,
    pub grid: Grid,
    pub player: Player,
    /// In release order
    pub pursuers: Vec<Pursuer>,
    pub director: ModeDirector,
    pub lives: u32,
    pub score: u64,
    /// 1-based
    pub level: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Cleared at the start of every tick
    pub events: Vec<GameEvent>,
    /// Pursuers captured since the last power pellet
    pub capture_chain: u32,
}

impl GameState {
    pub fn new(layout: MazeLayout, settings: LevelSettings, seed: u64) -> Result<Self, GridError> {
        let grid = layout.build_grid()?;
        layout.validate_spawns(&grid)?;

        let player = Player::new(layout.player_spawn);
        let pursuers = layout
            .pursuers
            .iter()
            .map(|p| Pursuer::new(p, layout.pen_exit))
            .collect();
        let director = ModeDirector::new(&settings);
        log::info!(
            "New game: seed {seed}, {}x{} maze, {} items, {} pursuers",
            grid.width(),
            grid.height(),
            grid.initial_items(),
            layout.pursuers.len()
        );

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: settings.lives,
            settings,
            layout,
            grid,
            player,
            pursuers,
            director,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            capture_chain: 0,
        })
    }

    /// The arcade maze with level-one settings
    pub fn classic(seed: u64) -> Result<Self, GridError> {
        Self::new(MazeLayout::classic(), LevelSettings::default(), seed)
    }

    /// Advance one step with no new input
    pub fn update(&mut self, dt: f32) {
        tick(self, &TickInput::default(), dt);
    }

    /// Queue a direction; it sticks until replaced or the player respawns
    pub fn set_desired_direction(&mut self, dir: Direction) {
        self.player.set_desired(dir);
    }

    /// Start countdown running
    pub fn is_starting(&self) -> bool {
        self.director.is_starting()
    }

    pub fn player_dying(&self) -> bool {
        matches!(self.phase, GamePhase::Dying { .. })
    }

    /// Seconds since the player was caught, while the death animation runs
    pub fn died_time(&self) -> Option<f32> {
        match self.phase {
            GamePhase::Dying { elapsed } => Some(elapsed),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == GamePhase::Cleared
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player.pos()
    }

    /// Put every actor back on its spawn tile and restart the schedule
    pub(crate) fn respawn_actors(&mut self) {
        self.player.respawn();
        for p in &mut self.pursuers {
            p.reset();
        }
        self.director.restart();
        self.capture_chain = 0;
    }

    /// Refill the maze and begin the next level. Ignored unless the current
    /// level has been cleared.
    pub fn start_next_level(&mut self) {
        if self.phase != GamePhase::Cleared {
            return;
        }
        self.grid.reset_items();
        self.respawn_actors();
        self.level += 1;
        self.phase = GamePhase::Playing;
        log::info!("Starting level {}", self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_state() {
        let state = GameState::classic(12345).expect("classic maze");
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.pursuers.len(), 4);
        assert_eq!(state.player_pos(), Vec2::new(13.0, 7.0));
        assert_eq!(state.grid.remaining_items(), 244);
        assert!(state.is_starting());
        assert_eq!(state.died_time(), None);
    }

    #[test]
    fn test_blocked_spawn_rejected() {
        let mut layout = MazeLayout::classic();
        layout.pursuers[2].spawn = Vec2::new(0.0, 30.0);
        let err = GameState::new(layout, LevelSettings::default(), 1).unwrap_err();
        assert_eq!(
            err,
            GridError::BlockedSpawn {
                actor: "pursuer 2".to_string(),
                x: 0,
                y: 30
            }
        );
    }

    #[test]
    fn test_next_level_needs_clear() {
        let mut state = GameState::classic(1).expect("classic maze");
        state.start_next_level();
        assert_eq!(state.level, 1);

        state.phase = GamePhase::Cleared;
        state.grid.consume_pellet_at(Vec2::new(1.0, 1.0));
        state.start_next_level();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.grid.remaining_items(), 244);
    }
}
