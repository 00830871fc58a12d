//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pursuers in release order)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod director;
pub mod grid;
pub mod layout;
pub mod motion;
pub mod player;
pub mod pursuer;
pub mod rect;
pub mod state;
pub mod targeting;
pub mod tick;

pub use clock::FixedTimestep;
pub use collision::{Contact, actors_overlap, classify_contact};
pub use director::{CollisionOutcome, DirectorStep, GlobalMode, ModeDirector};
pub use grid::{Grid, GridError, Tile};
pub use layout::{MazeLayout, PursuerSpawn};
pub use motion::{Direction, Mover};
pub use player::Player;
pub use pursuer::{Pursuer, PursuerMode};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState};
pub use targeting::{ChaseStrategy, TargetContext};
pub use tick::{TickInput, tick};
