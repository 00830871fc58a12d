//! Grid-locked continuous motion shared by the player and the pursuers
//!
//! Actors glide between tile centers along axis-aligned rails. A heading can
//! only change inside a small window around a tile center; outside of it the
//! velocity carries over untouched. Hitting a wall is resolved differently
//! per actor class: the player halts, pursuers fall back to their last safe
//! tile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::{near_tile_center, snap_to_tile};

/// Four-way heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Order in which steering evaluates exits; earlier entries win distance ties
    pub const STEERING_ORDER: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Unit step in tile space (y up)
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Down => Vec2::NEG_Y,
            Direction::Right => Vec2::X,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }

    /// Heading of an axis-aligned velocity; `None` when stopped
    pub fn from_velocity(vel: Vec2) -> Option<Self> {
        if vel.x.abs() >= vel.y.abs() {
            if vel.x > 0.0 {
                Some(Direction::Right)
            } else if vel.x < 0.0 {
                Some(Direction::Left)
            } else {
                None
            }
        } else if vel.y > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}

/// Position, velocity and speed of one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub pos: Vec2,
    /// Always axis-aligned, magnitude `speed` or zero
    pub vel: Vec2,
    /// Tiles per second, reassigned every tick by the director
    pub speed: f32,
    /// Seconds since the last heading or mode change (animation only)
    pub state_time: f32,
}

impl Mover {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed: 0.0,
            state_time: 0.0,
        }
    }

    #[inline]
    pub fn heading(&self) -> Option<Direction> {
        Direction::from_velocity(self.vel)
    }

    /// Inside the turn-commit window of the nearest tile center
    #[inline]
    pub fn can_turn(&self, threshold: f32) -> bool {
        near_tile_center(self.pos, threshold)
    }

    /// Drop floating drift by jumping onto the nearest tile
    #[inline]
    pub fn snap(&mut self) {
        self.pos = snap_to_tile(self.pos);
    }

    /// Point the velocity along `dir` at the current speed
    #[inline]
    pub fn set_heading(&mut self, dir: Direction) {
        self.vel = dir.to_vec2() * self.speed;
    }

    #[inline]
    pub fn reverse(&mut self) {
        self.vel = -self.vel;
    }

    #[inline]
    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    #[inline]
    pub fn next_position(&self, dt: f32) -> Vec2 {
        self.pos + self.vel * dt
    }

    /// Player policy: move, and on wall contact snap to the nearest tile and
    /// stop dead. Returns true if a wall was hit.
    pub fn advance_or_halt(&mut self, dt: f32, grid: &Grid) -> bool {
        self.pos = self.next_position(dt);
        if grid.collides_with_wall(self.pos, false) {
            self.snap();
            self.stop();
            return true;
        }
        false
    }

    /// Pursuer policy: remember the current tile while clear of walls, move,
    /// and on wall contact fall back to that tile keeping the velocity.
    /// Returns true if the move was reverted.
    pub fn advance_or_revert(&mut self, dt: f32, grid: &Grid, ignore_gate: bool, safe_pos: &mut Vec2) -> bool {
        if !grid.collides_with_wall(self.pos, ignore_gate) {
            *safe_pos = snap_to_tile(self.pos);
        }
        self.pos = self.next_position(dt);
        if grid.collides_with_wall(self.pos, ignore_gate) {
            self.pos = *safe_pos;
            return true;
        }
        false
    }

    /// Teleport across the maze if the actor left through a tunnel mouth
    pub fn wrap_tunnel(&mut self, grid: &Grid, margin: f32) -> bool {
        match grid.wrap_through_tunnel(self.pos, margin) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn distance_to(&self, target: Vec2) -> f32 {
        self.pos.distance(target)
    }
}
