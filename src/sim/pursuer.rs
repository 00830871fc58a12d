//! Pursuer AI: per-pursuer mode machine and greedy steering
//!
//! Every tick a pursuer picks a target from its mode, steers toward it at
//! tile centers, moves, then checks its mode exits. The director owns the
//! global Scatter/Chase schedule; a pursuer only remembers the last
//! baseline it was told about and flips (reversing) when that changes.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::director::GlobalMode;
use super::grid::Grid;
use super::layout::PursuerSpawn;
use super::motion::{Direction, Mover};
use super::targeting::ChaseStrategy;
use crate::consts::{FAST_PURSUER_SPEED, PURSUER_FAST_TURN_THRESHOLD, PURSUER_TURN_THRESHOLD, TARGET_REACHED_DISTANCE};
use crate::snap_to_tile;

/// Private mode of one pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerMode {
    /// Parked in the pen until released
    ConfinedWaiting,
    /// Leaving the pen through the gate
    ConfinedReleasing,
    Scatter,
    Chase,
    Frightened,
    /// Eaten; heading back into the pen
    Captured,
}

/// A pursuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub mover: Mover,
    mode: PursuerMode,
    /// Last Scatter/Chase published by the director
    baseline: PursuerMode,
    home: Vec2,
    pen_exit: Vec2,
    pen_return: Vec2,
    /// Supplied by the director every tick
    chase_target: Vec2,
    /// Current steering target, `None` while waiting in the pen
    target: Option<Vec2>,
    /// Last snapped position that was clear of walls
    safe_pos: Vec2,
    /// Tile where the last turn was committed; cleared once outside the turn window
    turned_at: Option<IVec2>,
    pub strategy: ChaseStrategy,
    /// Eligible for the low-item speed boost
    pub angry: bool,
    spawn: Vec2,
    initial_mode: PursuerMode,
}

impl Pursuer {
    pub fn new(layout: &PursuerSpawn, pen_exit: Vec2) -> Self {
        Self {
            mover: Mover::new(layout.spawn),
            mode: layout.initial_mode,
            baseline: PursuerMode::Scatter,
            home: layout.home,
            pen_exit,
            pen_return: layout.pen_return,
            chase_target: layout.spawn,
            target: None,
            safe_pos: layout.spawn,
            turned_at: None,
            strategy: layout.strategy,
            angry: layout.angry,
            spawn: layout.spawn,
            initial_mode: layout.initial_mode,
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

    #[inline]
    pub fn mode(&self) -> PursuerMode {
        self.mode
    }

    #[inline]
    pub fn home(&self) -> Vec2 {
        self.home
    }

    #[inline]
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == PursuerMode::Frightened
    }

    pub fn is_captured(&self) -> bool {
        self.mode == PursuerMode::Captured
    }

    /// Waiting in or leaving the pen
    pub fn is_confined(&self) -> bool {
        matches!(self.mode, PursuerMode::ConfinedWaiting | PursuerMode::ConfinedReleasing)
    }

    pub fn is_releasing(&self) -> bool {
        self.mode == PursuerMode::ConfinedReleasing
    }

    pub fn set_chase_target(&mut self, target: Vec2) {
        self.chase_target = target;
    }

    /// Record the director's baseline. Frightened is not a baseline and is
    /// delivered through `set_frightened` instead.
    pub fn set_global_mode(&mut self, mode: GlobalMode) {
        match mode {
            GlobalMode::Scatter => self.baseline = PursuerMode::Scatter,
            GlobalMode::Chase => self.baseline = PursuerMode::Chase,
            GlobalMode::Frightened => {}
        }
    }

    /// Enter or leave Frightened.
    ///
    /// Only Scatter/Chase pursuers accept fright; they turn around when they
    /// do. Clearing fright returns to the baseline without reversing.
    pub fn set_frightened(&mut self, frightened: bool) {
        if frightened {
            if matches!(self.mode, PursuerMode::Scatter | PursuerMode::Chase) {
                self.mover.reverse();
                self.enter(PursuerMode::Frightened);
            }
        } else if self.mode == PursuerMode::Frightened {
            self.enter(self.baseline);
        }
    }

    /// Frightened -> Captured. Returns true only on the transition itself;
    /// an already captured pursuer stays captured and reports false.
    pub fn capture(&mut self) -> bool {
        if self.mode == PursuerMode::Frightened {
            self.enter(PursuerMode::Captured);
            return true;
        }
        false
    }

    /// ConfinedWaiting -> ConfinedReleasing; ignored in any other mode
    pub fn release(&mut self) -> bool {
        if self.mode == PursuerMode::ConfinedWaiting {
            self.enter(PursuerMode::ConfinedReleasing);
            return true;
        }
        false
    }

    /// Back to the spawn tile in the initial mode (player death, new level)
    pub fn reset(&mut self) {
        self.mover = Mover::new(self.spawn);
        self.mode = self.initial_mode;
        self.baseline = PursuerMode::Scatter;
        self.chase_target = self.spawn;
        self.target = None;
        self.safe_pos = self.spawn;
        self.turned_at = None;
    }

    /// Target, movement, then mode exits
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, grid: &Grid, rng: &mut R) {
        self.update_target(grid, rng);

        if self.mode != PursuerMode::ConfinedWaiting {
            let ignore_gate = matches!(self.mode, PursuerMode::ConfinedReleasing | PursuerMode::Captured);
            self.steer(grid, ignore_gate);
            if self.mover.advance_or_revert(dt, grid, ignore_gate, &mut self.safe_pos) {
                // back on a tile center; allow a fresh decision there
                self.turned_at = None;
            }
        }

        self.mover.state_time += dt;
        self.update_mode();
    }

    fn update_target<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.target = match self.mode {
            PursuerMode::ConfinedWaiting => None,
            PursuerMode::ConfinedReleasing => Some(self.pen_exit),
            PursuerMode::Scatter => Some(self.home),
            PursuerMode::Chase => Some(self.chase_target),
            PursuerMode::Frightened => {
                let cells = grid.open_cells();
                if cells.is_empty() {
                    self.target
                } else {
                    Some(cells[rng.random_range(0..cells.len())].as_vec2())
                }
            }
            PursuerMode::Captured => Some(self.pen_return),
        };
    }

    /// A Scatter/Chase change the pursuer has not acted on yet
    fn flip_pending(&self) -> bool {
        matches!(self.mode, PursuerMode::Scatter | PursuerMode::Chase) && self.mode != self.baseline
    }

    fn turn_threshold(&self) -> f32 {
        if self.mover.speed >= FAST_PURSUER_SPEED {
            PURSUER_FAST_TURN_THRESHOLD
        } else {
            PURSUER_TURN_THRESHOLD
        }
    }

    fn steer(&mut self, grid: &Grid, ignore_gate: bool) {
        if !self.mover.can_turn(self.turn_threshold()) {
            self.turned_at = None;
            return;
        }
        // the flip itself reverses this tick; turning too would break the mirror
        if self.flip_pending() {
            return;
        }
        let tile = snap_to_tile(self.mover.pos).as_ivec2();
        if self.turned_at == Some(tile) {
            return;
        }
        self.turned_at = Some(tile);
        self.mover.snap();

        if let Some(dir) = self.choose_direction(grid, ignore_gate) {
            self.mover.set_heading(dir);
        }
    }

    /// Closest open exit to the target, never reversing. Ties go to the
    /// earliest entry of `Direction::STEERING_ORDER`.
    fn choose_direction(&self, grid: &Grid, ignore_gate: bool) -> Option<Direction> {
        let target = self.target?;
        let back = self.mover.heading().map(Direction::opposite);

        let mut best: Option<(Direction, f32)> = None;
        for dir in Direction::STEERING_ORDER {
            if Some(dir) == back {
                continue;
            }
            let next = self.mover.pos + dir.to_vec2();
            if grid.collides_with_wall(next, ignore_gate) {
                continue;
            }
            let dist = next.distance(target);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((dir, dist));
            }
        }
        best.map(|(dir, _)| dir)
    }

    fn reached(&self, point: Vec2) -> bool {
        self.mover.distance_to(point) < TARGET_REACHED_DISTANCE
    }

    fn update_mode(&mut self) {
        match self.mode {
            PursuerMode::ConfinedReleasing => {
                if self.reached(self.pen_exit) {
                    self.mover.pos = self.pen_exit;
                    self.turned_at = None;
                    self.enter(self.baseline);
                }
            }
            PursuerMode::Scatter | PursuerMode::Chase => {
                if self.flip_pending() {
                    self.mover.reverse();
                    self.enter(self.baseline);
                }
            }
            PursuerMode::Captured => {
                if self.reached(self.pen_return) {
                    self.mover.pos = self.pen_return;
                    self.turned_at = None;
                    self.enter(PursuerMode::ConfinedReleasing);
                }
            }
            PursuerMode::ConfinedWaiting | PursuerMode::Frightened => {}
        }
    }

    fn enter(&mut self, mode: PursuerMode) {
        log::trace!("pursuer {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.mover.state_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::LevelSettings;
    use crate::sim::layout::MazeLayout;
    use crate::sim::rect::Rect;
    use crate::sim::state::{GamePhase, GameState};
    use crate::sim::tick::{TickInput, tick};
    use crate::tile_offset;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_room() -> Grid {
        let rows = [
            "#######",
            "#     #",
            "#     #",
            "#     #",
            "#     #",
            "#     #",
            "#######",
        ];
        let tunnels = [Rect::new(-10.0, -10.0, 1.0, 1.0), Rect::new(20.0, -10.0, 1.0, 1.0)];
        Grid::from_rows(&rows, tunnels).expect("valid maze")
    }

    fn spawn(mode: PursuerMode, home: Vec2) -> PursuerSpawn {
        PursuerSpawn {
            spawn: Vec2::new(3.0, 3.0),
            initial_mode: mode,
            home,
            pen_return: Vec2::new(1.0, 1.0),
            strategy: ChaseStrategy::Direct,
            angry: false,
        }
    }

    fn scatter_toward(home: Vec2) -> Pursuer {
        let mut p = Pursuer::new(&spawn(PursuerMode::Scatter, home), Vec2::new(3.0, 5.0));
        p.mover.speed = 5.0;
        p
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_tie_prefers_up_over_left() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(2.0, 4.0));
        p.tick(SIM_DT, &grid, &mut rng());
        assert_eq!(p.mover.heading(), Some(Direction::Up));
    }

    #[test]
    fn test_tie_prefers_down_over_right() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(4.0, 2.0));
        p.tick(SIM_DT, &grid, &mut rng());
        assert_eq!(p.mover.heading(), Some(Direction::Down));
    }

    #[test]
    fn test_never_reverses_at_junction() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(1.0, 3.0));
        p.mover.set_heading(Direction::Right);
        p.tick(SIM_DT, &grid, &mut rng());
        // left is closest but is a reversal; up and down tie, up wins
        assert_eq!(p.mover.heading(), Some(Direction::Up));
    }

    #[test]
    fn test_one_decision_per_tile() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(3.0, 5.0));
        p.tick(SIM_DT, &grid, &mut rng());
        assert_eq!(p.mover.heading(), Some(Direction::Up));
        let y = p.pos().y;
        // still inside the window of (3, 3); must keep moving, not snap back
        p.tick(SIM_DT, &grid, &mut rng());
        assert!(p.pos().y > y);
    }

    #[test]
    fn test_waiting_pursuer_stays_put() {
        let grid = open_room();
        let mut p = Pursuer::new(&spawn(PursuerMode::ConfinedWaiting, Vec2::ZERO), Vec2::new(3.0, 5.0));
        p.mover.speed = 5.0;
        for _ in 0..30 {
            p.tick(SIM_DT, &grid, &mut rng());
        }
        assert_eq!(p.pos(), Vec2::new(3.0, 3.0));
        assert_eq!(p.target(), None);
        assert!(p.is_confined());
    }

    #[test]
    fn test_release_reaches_exit() {
        let grid = open_room();
        let mut p = Pursuer::new(&spawn(PursuerMode::ConfinedWaiting, Vec2::ZERO), Vec2::new(3.0, 5.0));
        p.mover.speed = 5.0;
        assert!(p.release());
        assert!(!p.release());
        assert!(p.is_releasing());
        for _ in 0..240 {
            p.tick(SIM_DT, &grid, &mut rng());
            if !p.is_confined() {
                break;
            }
        }
        assert_eq!(p.mode(), PursuerMode::Scatter);
        assert_eq!(p.pos(), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_mode_flip_reverses_exactly() {
        let grid = open_room();
        for x in [3.0, 3.5] {
            let mut p = scatter_toward(Vec2::new(5.0, 3.0));
            p.mover.pos = Vec2::new(x, 3.0);
            p.mover.set_heading(Direction::Right);
            p.turned_at = Some(IVec2::new(3, 3));
            let before = p.vel();
            p.set_global_mode(GlobalMode::Chase);
            p.tick(SIM_DT, &grid, &mut rng());
            assert_eq!(p.mode(), PursuerMode::Chase);
            assert_eq!(p.vel(), -before);
        }
    }

    #[test]
    fn test_fright_eligibility() {
        let mut p = scatter_toward(Vec2::new(5.0, 3.0));
        p.mover.set_heading(Direction::Right);
        p.set_frightened(true);
        assert!(p.is_frightened());
        assert_eq!(p.mover.heading(), Some(Direction::Left));

        // clearing goes back to the baseline without turning around
        p.set_frightened(false);
        assert_eq!(p.mode(), PursuerMode::Scatter);
        assert_eq!(p.mover.heading(), Some(Direction::Left));

        let mut waiting = Pursuer::new(&spawn(PursuerMode::ConfinedWaiting, Vec2::ZERO), Vec2::ZERO);
        waiting.set_frightened(true);
        assert_eq!(waiting.mode(), PursuerMode::ConfinedWaiting);
    }

    #[test]
    fn test_capture_is_idempotent() {
        let mut p = scatter_toward(Vec2::new(5.0, 3.0));
        assert!(!p.capture());
        p.set_frightened(true);
        assert!(p.capture());
        assert!(p.is_captured());
        assert!(!p.capture());
        assert!(p.is_captured());
        // captured pursuers ignore fright
        p.set_frightened(true);
        assert!(p.is_captured());
    }

    #[test]
    fn test_frightened_targets_open_cells() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(5.0, 3.0));
        p.set_frightened(true);
        let mut rng = rng();
        for _ in 0..50 {
            p.tick(SIM_DT, &grid, &mut rng);
            let target = p.target().expect("frightened pursuers always have a target");
            assert!(grid.open_cells().contains(&target.as_ivec2()));
        }
    }

    #[test]
    fn test_captured_returns_to_pen() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(5.0, 3.0));
        p.set_frightened(true);
        p.capture();
        p.mover.speed = 10.0;
        for _ in 0..480 {
            p.tick(SIM_DT, &grid, &mut rng());
            if !p.is_captured() {
                break;
            }
        }
        assert!(p.is_releasing());
        assert_eq!(p.pos(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let grid = open_room();
        let mut p = scatter_toward(Vec2::new(5.0, 5.0));
        for _ in 0..20 {
            p.tick(SIM_DT, &grid, &mut rng());
        }
        p.set_global_mode(GlobalMode::Chase);
        p.reset();
        assert_eq!(p.pos(), Vec2::new(3.0, 3.0));
        assert_eq!(p.vel(), Vec2::ZERO);
        assert_eq!(p.mode(), PursuerMode::Scatter);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_pursuers_keep_heading_between_tiles(
            seed in any::<u64>(),
            inputs in prop::collection::vec(
                prop::option::of(prop::sample::select(Direction::STEERING_ORDER.to_vec())),
                600..900,
            ),
        ) {
            let settings = LevelSettings {
                start_delay: 0.0,
                ..Default::default()
            };
            let mut state = GameState::new(MazeLayout::classic(), settings, seed).expect("classic maze");
            for desired in inputs {
                let before: Vec<(Vec2, Vec2, PursuerMode)> =
                    state.pursuers.iter().map(|p| (p.pos(), p.vel(), p.mode())).collect();
                tick(&mut state, &TickInput { desired }, SIM_DT);
                if state.phase != GamePhase::Playing {
                    break;
                }
                for (p, (pos, vel, mode)) in state.pursuers.iter().zip(before) {
                    // off-center for every window size, and no mode change to reverse it
                    if tile_offset(pos) >= PURSUER_FAST_TURN_THRESHOLD && p.mode() == mode {
                        prop_assert_eq!(p.vel(), vel);
                    }
                }
            }
        }
    }
}
