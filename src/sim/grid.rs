//! Tile grid: walls, items, the pen gate and the side tunnels
//!
//! Coordinates are tile units with y growing upward. Tile (x, y) covers
//! `[x, x+1) x [y, y+1)`; actors are 1x1 boxes anchored at their position,
//! so an actor at an integer position sits exactly on one tile.
//!
//! Queries outside the grid never fail: they report no wall and no item.

use core::fmt;
use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Static classification of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Open,
    Wall,
    /// Wall that pursuers pass through while entering or leaving the pen
    Gate,
    Pellet,
    PowerPellet,
}

impl Tile {
    /// Text form used by maze rows
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Tile::Open),
            '#' => Some(Tile::Wall),
            '-' => Some(Tile::Gate),
            '.' => Some(Tile::Pellet),
            'o' => Some(Tile::PowerPellet),
            _ => None,
        }
    }

    #[inline]
    pub fn is_item(self) -> bool {
        matches!(self, Tile::Pellet | Tile::PowerPellet)
    }

    #[inline]
    fn blocks(self, ignore_gate: bool) -> bool {
        match self {
            Tile::Wall => true,
            Tile::Gate => !ignore_gate,
            _ => false,
        }
    }
}

/// Errors raised while building a grid or placing actors on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownTile { row: usize, col: usize, found: char },
    BlockedSpawn { actor: String, x: i32, y: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "maze has no rows"),
            Self::RaggedRow { row, expected, found } => {
                write!(f, "maze row {row} has {found} tiles, expected {expected}")
            }
            Self::UnknownTile { row, col, found } => {
                write!(f, "unknown tile {found:?} at row {row}, column {col}")
            }
            Self::BlockedSpawn { actor, x, y } => {
                write!(f, "{actor} spawns inside a wall at ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// The maze for one level
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major from the bottom row up
    tiles: Vec<Tile>,
    /// Load-time tiles, for restoring items on a new level
    initial_tiles: Vec<Tile>,
    /// Left tunnel first
    tunnels: [Rect; 2],
    open_cells: Vec<IVec2>,
    initial_items: u32,
    remaining_items: u32,
}

impl Grid {
    /// Build a grid from text rows, top row first
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tunnels: [Rect; 2]) -> Result<Self, GridError> {
        let first = rows.first().ok_or(GridError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::Empty);
        }
        let height = rows.len();

        let mut tiles = vec![Tile::Open; width * height];
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow { row, expected: width, found });
            }
            let y = height - 1 - row;
            for (col, c) in line.chars().enumerate() {
                let tile = Tile::from_char(c).ok_or(GridError::UnknownTile { row, col, found: c })?;
                tiles[y * width + col] = tile;
            }
        }

        let initial_items = tiles.iter().filter(|t| t.is_item()).count() as u32;

        let mut tunnels = tunnels;
        if tunnels[0].min.x > tunnels[1].min.x {
            tunnels.swap(0, 1);
        }
        let open_cells = main_region(&tiles, width, height, &tunnels);

        Ok(Self {
            width: width as i32,
            height: height as i32,
            initial_tiles: tiles.clone(),
            tiles,
            tunnels,
            open_cells,
            initial_items,
            remaining_items: initial_items,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tile at (x, y), or `None` outside the grid
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles[(y * self.width + x) as usize])
    }

    /// Walls and gate cells; false outside the grid
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.blocks(false))
    }

    pub fn is_gate(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Some(Tile::Gate)
    }

    pub fn is_pellet(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Some(Tile::Pellet)
    }

    pub fn is_super_pellet(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Some(Tile::PowerPellet)
    }

    /// True if a unit box anchored at `point` overlaps any wall.
    ///
    /// With `ignore_gate` the gate cells are treated as open.
    pub fn collides_with_wall(&self, point: Vec2, ignore_gate: bool) -> bool {
        let footprint = Rect::square(point, 1.0);
        let x0 = point.x.round() as i32;
        let y0 = point.y.round() as i32;
        for x in x0 - 1..=x0 + 1 {
            for y in y0 - 1..=y0 + 1 {
                let blocked = self.tile(x, y).is_some_and(|t| t.blocks(ignore_gate));
                if blocked && footprint.overlaps(&Rect::tile(x, y)) {
                    return true;
                }
            }
        }
        false
    }

    /// Eat a pellet under `point`. Returns true only the first time.
    pub fn consume_pellet_at(&mut self, point: Vec2) -> bool {
        self.consume_at(point, Tile::Pellet)
    }

    /// Eat a power pellet under `point`. Returns true only the first time.
    pub fn consume_super_pellet_at(&mut self, point: Vec2) -> bool {
        self.consume_at(point, Tile::PowerPellet)
    }

    /// Only a cell whose center lies inside the footprint is eligible, so an
    /// actor straddling two tiles never eats from both.
    fn consume_at(&mut self, point: Vec2, kind: Tile) -> bool {
        let footprint = Rect::square(point, 1.0);
        let x0 = point.x.round() as i32;
        let y0 = point.y.round() as i32;
        for x in x0 - 1..=x0 + 1 {
            for y in y0 - 1..=y0 + 1 {
                if self.tile(x, y) != Some(kind) {
                    continue;
                }
                if footprint.contains_half_open(Rect::tile(x, y).center()) {
                    self.tiles[(y * self.width + x) as usize] = Tile::Open;
                    self.remaining_items -= 1;
                    return true;
                }
            }
        }
        false
    }

    /// True if `point` lies inside either tunnel zone
    pub fn in_tunnel(&self, point: Vec2) -> bool {
        self.tunnels.iter().any(|t| t.contains(point))
    }

    /// Where an actor at `pos` reappears after leaving through a tunnel mouth.
    ///
    /// `margin` is how far past the mouth it may travel first. Returns `None`
    /// when no wrap is due.
    pub fn wrap_through_tunnel(&self, pos: Vec2, margin: f32) -> Option<Vec2> {
        let [left, right] = self.tunnels;
        if pos.x < left.min.x - margin && left.spans_y(pos.y) {
            Some(Vec2::new(right.max().x - 1.0, pos.y))
        } else if pos.x > right.max().x - 1.0 + margin && right.spans_y(pos.y) {
            Some(Vec2::new(left.min.x, pos.y))
        } else {
            None
        }
    }

    /// Walkable cells a pursuer outside the pen can reach (gate closed,
    /// tunnels open). Fright targets are drawn from these.
    pub fn open_cells(&self) -> &[IVec2] {
        &self.open_cells
    }

    /// Pellets and power pellets present at load
    #[inline]
    pub fn initial_items(&self) -> u32 {
        self.initial_items
    }

    #[inline]
    pub fn remaining_items(&self) -> u32 {
        self.remaining_items
    }

    #[inline]
    pub fn eaten_items(&self) -> u32 {
        self.initial_items - self.remaining_items
    }

    /// Put every item back (new level)
    pub fn reset_items(&mut self) {
        self.tiles.copy_from_slice(&self.initial_tiles);
        self.remaining_items = self.initial_items;
    }
}

/// Cells of the largest region walkable with the gate closed, row-major.
///
/// Side tunnels link the two edge columns on the rows they span. Pockets
/// outside the maze walls and the pen interior fall into smaller regions
/// and are dropped.
fn main_region(tiles: &[Tile], width: usize, height: usize, tunnels: &[Rect; 2]) -> Vec<IVec2> {
    let walkable = |i: usize| !tiles[i].blocks(false);
    let mut region: Vec<Option<usize>> = vec![None; tiles.len()];
    let mut sizes: Vec<usize> = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..tiles.len() {
        if !walkable(start) || region[start].is_some() {
            continue;
        }
        let id = sizes.len();
        let mut size = 0;
        region[start] = Some(id);
        queue.push_back(start);

        while let Some(i) = queue.pop_front() {
            size += 1;
            let (x, y) = (i % width, i / width);
            let mut neighbors = [None; 4];
            neighbors[0] = (x > 0).then(|| i - 1);
            neighbors[1] = (x + 1 < width).then(|| i + 1);
            neighbors[2] = (y > 0).then(|| i - width);
            neighbors[3] = (y + 1 < height).then(|| i + width);
            // wrap through a tunnel
            if x == 0 && tunnels[0].spans_y(y as f32) {
                neighbors[0] = Some(i + width - 1);
            }
            if x + 1 == width && tunnels[1].spans_y(y as f32) {
                neighbors[1] = Some(i + 1 - width);
            }

            for n in neighbors.into_iter().flatten() {
                if walkable(n) && region[n].is_none() {
                    region[n] = Some(id);
                    queue.push_back(n);
                }
            }
        }
        sizes.push(size);
    }

    // first region wins a size tie
    let mut main = None;
    let mut best = 0;
    for (id, &size) in sizes.iter().enumerate() {
        if size > best {
            best = size;
            main = Some(id);
        }
    }
    let Some(main) = main else {
        return Vec::new();
    };

    region
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == Some(main))
        .map(|(i, _)| IVec2::new((i % width) as i32, (i / width) as i32))
        .collect()
}
