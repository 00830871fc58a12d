//! Static level description: maze rows, tunnels and actor placement
//!
//! A layout is pure data. `GameState` builds a fresh `Grid` from it and
//! places the actors on their spawn tiles.

use glam::Vec2;

use super::grid::{Grid, GridError};
use super::pursuer::PursuerMode;
use super::rect::Rect;
use super::targeting::ChaseStrategy;

const CLASSIC_ROWS: &[&str] = &[
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Where one pursuer starts and which tiles it steers for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuerSpawn {
    pub spawn: Vec2,
    /// Either `Scatter` (starts outside the pen) or `ConfinedWaiting`
    pub initial_mode: PursuerMode,
    /// Scatter corner, usually outside the maze bounds
    pub home: Vec2,
    /// Tile a captured pursuer heads for inside the pen
    pub pen_return: Vec2,
    pub strategy: ChaseStrategy,
    /// Eligible for the low-item speed boost
    pub angry: bool,
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    /// Top row first
    pub rows: Vec<String>,
    pub tunnels: [Rect; 2],
    pub player_spawn: Vec2,
    /// Tile just above the pen gate
    pub pen_exit: Vec2,
    /// Release order follows this order
    pub pursuers: Vec<PursuerSpawn>,
}

impl MazeLayout {
    /// The 28x31 arcade maze with four pursuers
    pub fn classic() -> Self {
        let pursuers = vec![
            PursuerSpawn {
                spawn: Vec2::new(12.0, 19.0),
                initial_mode: PursuerMode::Scatter,
                home: Vec2::new(25.0, 33.0),
                pen_return: Vec2::new(11.0, 15.0),
                strategy: ChaseStrategy::Direct,
                angry: true,
            },
            PursuerSpawn {
                spawn: Vec2::new(12.0, 16.0),
                initial_mode: PursuerMode::ConfinedWaiting,
                home: Vec2::new(2.0, 33.0),
                pen_return: Vec2::new(12.0, 15.0),
                strategy: ChaseStrategy::Ambush { lookahead: 4.0 },
                angry: false,
            },
            PursuerSpawn {
                spawn: Vec2::new(14.0, 16.0),
                initial_mode: PursuerMode::ConfinedWaiting,
                home: Vec2::new(28.0, -5.0),
                pen_return: Vec2::new(14.0, 15.0),
                strategy: ChaseStrategy::Flank {
                    reference: 0,
                    lookahead: 2.0,
                },
                angry: false,
            },
            PursuerSpawn {
                spawn: Vec2::new(16.0, 16.0),
                initial_mode: PursuerMode::ConfinedWaiting,
                home: Vec2::new(-1.0, -3.0),
                pen_return: Vec2::new(16.0, 15.0),
                strategy: ChaseStrategy::Shy { radius: 8.0 },
                angry: false,
            },
        ];

        Self {
            rows: CLASSIC_ROWS.iter().map(|r| (*r).to_string()).collect(),
            tunnels: [Rect::new(0.0, 15.0, 5.0, 3.0), Rect::new(23.0, 15.0, 5.0, 3.0)],
            player_spawn: Vec2::new(13.0, 7.0),
            pen_exit: Vec2::new(13.0, 19.0),
            pursuers,
        }
    }

    pub fn build_grid(&self) -> Result<Grid, GridError> {
        Grid::from_rows(&self.rows, self.tunnels)
    }

    /// Reject layouts that drop an actor inside a wall
    pub fn validate_spawns(&self, grid: &Grid) -> Result<(), GridError> {
        let blocked = |actor: String, pos: Vec2, ignore_gate: bool| {
            if grid.collides_with_wall(pos, ignore_gate) {
                Err(GridError::BlockedSpawn {
                    actor,
                    x: pos.x.round() as i32,
                    y: pos.y.round() as i32,
                })
            } else {
                Ok(())
            }
        };

        blocked("player".to_string(), self.player_spawn, false)?;
        blocked("pen exit".to_string(), self.pen_exit, true)?;
        for (i, p) in self.pursuers.iter().enumerate() {
            blocked(format!("pursuer {i}"), p.spawn, true)?;
            blocked(format!("pursuer {i} pen return"), p.pen_return, true)?;
        }
        Ok(())
    }
}
