//! The player-controlled actor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::motion::{Direction, Mover};
use crate::consts::{EATING_DURATION, PLAYER_TURN_THRESHOLD};
use crate::snap_to_tile;

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub mover: Mover,
    /// Last requested direction; sticks until replaced or the player respawns
    pub desired: Option<Direction>,
    /// Seconds left on the eating flag
    eating_remaining: f32,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            mover: Mover::new(spawn),
            desired: None,
            eating_remaining: 0.0,
            spawn,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.mover.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.mover.vel
    }

    pub fn set_desired(&mut self, dir: Direction) {
        self.desired = Some(dir);
    }

    /// Steer and move one step.
    ///
    /// A requested turn is taken only near a tile center and only if the
    /// tile in that direction is open. Running into a wall stops the player
    /// on the nearest tile.
    pub fn tick(&mut self, dt: f32, grid: &Grid) {
        self.mover.state_time += dt;

        if self.mover.can_turn(PLAYER_TURN_THRESHOLD) {
            let heading = self.mover.heading();
            match self.desired {
                Some(dir) if Some(dir) != heading && self.can_enter(dir, grid) => {
                    self.mover.snap();
                    self.mover.set_heading(dir);
                    self.mover.state_time = 0.0;
                }
                _ => {
                    // keep the heading but pick up any speed change
                    if let Some(dir) = heading {
                        self.mover.set_heading(dir);
                    }
                }
            }
        }

        self.mover.advance_or_halt(dt, grid);
    }

    fn can_enter(&self, dir: Direction, grid: &Grid) -> bool {
        let next = snap_to_tile(self.mover.pos) + dir.to_vec2();
        !grid.collides_with_wall(next, false)
    }

    /// Raise the eating flag for its full duration
    pub fn note_eating(&mut self) {
        self.eating_remaining = EATING_DURATION;
    }

    pub fn tick_eating(&mut self, dt: f32) {
        self.eating_remaining = (self.eating_remaining - dt).max(0.0);
    }

    #[inline]
    pub fn is_eating(&self) -> bool {
        self.eating_remaining > 0.0
    }

    #[inline]
    pub fn eating_time_left(&self) -> f32 {
        self.eating_remaining
    }

    /// Back to the spawn tile, stopped, with input cleared
    pub fn respawn(&mut self) {
        self.mover = Mover::new(self.spawn);
        self.desired = None;
        self.eating_remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use proptest::prelude::*;

    const SIM_DT: f32 = crate::consts::SIM_DT;

    /// A plus-shaped junction at (3, 3) with arms of length 2
    fn junction() -> Grid {
        let rows = [
            "#######",
            "###.###",
            "###.###",
            "#.....#",
            "###.###",
            "###.###",
            "#######",
        ];
        let tunnels = [Rect::new(-10.0, -10.0, 1.0, 1.0), Rect::new(20.0, -10.0, 1.0, 1.0)];
        Grid::from_rows(&rows, tunnels).expect("valid maze")
    }

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::new(Vec2::new(x, y));
        player.mover.speed = 6.0;
        player
    }

    #[test]
    fn test_turn_commits_at_center() {
        let grid = junction();
        let mut player = player_at(3.0, 3.0);
        player.set_desired(Direction::Up);
        player.tick(SIM_DT, &grid);
        assert_eq!(player.vel(), Vec2::new(0.0, 6.0));
        assert!(player.pos().y > 3.0);
    }

    #[test]
    fn test_turn_into_wall_is_refused() {
        let grid = junction();
        let mut player = player_at(2.0, 3.0);
        player.set_desired(Direction::Up);
        player.tick(SIM_DT, &grid);
        assert_eq!(player.vel(), Vec2::ZERO);
        assert_eq!(player.pos(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_desired_turn_waits_for_junction() {
        let grid = junction();
        let mut player = player_at(1.0, 3.0);
        player.set_desired(Direction::Right);
        player.tick(SIM_DT, &grid);
        player.set_desired(Direction::Up);

        // roll along the corridor until the junction picks up the queued turn
        for _ in 0..60 {
            player.tick(SIM_DT, &grid);
            if player.mover.heading() == Some(Direction::Up) {
                break;
            }
        }
        assert_eq!(player.mover.heading(), Some(Direction::Up));
        assert_eq!(player.pos().x, 3.0);
    }

    #[test]
    fn test_wall_stops_player() {
        let grid = junction();
        let mut player = player_at(4.0, 3.0);
        player.set_desired(Direction::Right);
        for _ in 0..120 {
            player.tick(SIM_DT, &grid);
        }
        assert_eq!(player.pos(), Vec2::new(5.0, 3.0));
        assert_eq!(player.vel(), Vec2::ZERO);
    }

    #[test]
    fn test_eating_flag_expires() {
        let mut player = player_at(1.0, 3.0);
        player.note_eating();
        assert!(player.is_eating());
        player.tick_eating(0.3);
        assert!(player.is_eating());
        player.tick_eating(0.3);
        assert!(!player.is_eating());
        assert_eq!(player.eating_time_left(), 0.0);
    }

    #[test]
    fn test_respawn_clears_input() {
        let grid = junction();
        let mut player = player_at(1.0, 3.0);
        player.set_desired(Direction::Right);
        player.tick(SIM_DT, &grid);
        player.respawn();
        assert_eq!(player.pos(), Vec2::new(1.0, 3.0));
        assert_eq!(player.desired, None);
        assert_eq!(player.vel(), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_no_turning_mid_tile(
            offset in 0.06f32..0.94,
            initial in prop::sample::select(vec![Direction::Left, Direction::Right]),
            desired in prop::sample::select(Direction::STEERING_ORDER.to_vec()),
        ) {
            let grid = junction();
            // between tile centers on the horizontal corridor
            let mut player = player_at(2.0 + offset, 3.0);
            player.mover.set_heading(initial);
            let before = player.vel();
            player.set_desired(desired);
            player.tick(SIM_DT, &grid);
            prop_assert_eq!(player.vel(), before);
        }
    }
}
