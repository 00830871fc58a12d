//! Axis-aligned rectangles in tile space
//!
//! Actors, wall tiles and tunnel zones are all boxes anchored at their
//! lower-left corner:
//! - `min`: lower-left corner (tile units)
//! - `size`: width and height
//!
//! Overlap is strict (touching edges do not overlap) so an actor sitting
//! exactly on a tile next to a wall is not "in" the wall. Containment is
//! inclusive on every edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Square footprint of side `side` anchored at `pos`
    #[inline]
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self {
            min: pos,
            size: Vec2::splat(side),
        }
    }

    /// The unit box covering tile (x, y)
    #[inline]
    pub fn tile(x: i32, y: i32) -> Self {
        Self::new(x as f32, y as f32, 1.0, 1.0)
    }

    /// Upper-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Half-open containment, `min <= p < max` per axis. Boxes that tile the
    /// plane never both claim the same point.
    pub fn contains_half_open(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    /// True if `y` lies within the vertical extent of the box
    #[inline]
    pub fn spans_y(&self, y: f32) -> bool {
        y >= self.min.y && y <= self.max().y
    }
}
