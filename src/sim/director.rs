//! Mode director: the global Scatter/Chase schedule and everything that
//! follows from it
//!
//! The director owns the only schedule timer. Pursuers never read the clock
//! themselves; they are told the global mode, their chase target, whether
//! they may leave the pen and how fast to move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, classify_contact};
use super::grid::Grid;
use super::player::Player;
use super::pursuer::Pursuer;
use super::targeting::TargetContext;
use crate::settings::{LevelSettings, SpeedSettings};

/// Mode published to every pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalMode {
    Scatter,
    Chase,
    Frightened,
}

/// Schedule position saved while a fright is running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PhaseSnapshot {
    mode: GlobalMode,
    elapsed: f32,
    duration: f32,
}

/// Whether entity logic may run this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorStep {
    /// Start countdown still running; nothing else moves
    Gated,
    Running,
}

/// Contacts found by one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Pursuers captured this tick, in pursuer order
    pub captured: Vec<usize>,
    pub player_caught: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeDirector {
    schedule: Vec<f32>,
    phase_index: usize,
    mode: GlobalMode,
    elapsed: f32,
    duration: f32,
    saved: Option<PhaseSnapshot>,
    fright_duration: f32,
    start_delay: f32,
    starting: bool,
    start_remaining: f32,
    release_thresholds: Vec<u32>,
    serial_release: bool,
    speeds: SpeedSettings,
}

impl ModeDirector {
    pub fn new(settings: &LevelSettings) -> Self {
        let mut director = Self {
            schedule: settings.schedule.clone(),
            phase_index: 0,
            mode: GlobalMode::Scatter,
            elapsed: 0.0,
            duration: 0.0,
            saved: None,
            fright_duration: settings.fright_duration,
            start_delay: settings.start_delay,
            starting: false,
            start_remaining: 0.0,
            release_thresholds: settings.release_thresholds.clone(),
            serial_release: settings.serial_release,
            speeds: settings.speeds.clone(),
        };
        if director.schedule.is_empty() {
            log::warn!("empty mode schedule; pursuers will chase from the start");
        }
        director.restart();
        director
    }

    /// Schedule back to its first phase and the start countdown re-armed
    pub fn restart(&mut self) {
        self.phase_index = 0;
        let (mode, duration) = self.phase(0);
        self.mode = mode;
        self.duration = duration;
        self.elapsed = 0.0;
        self.saved = None;
        self.starting = self.start_delay > 0.0;
        self.start_remaining = self.start_delay;
    }

    /// Mode and length of schedule entry `index`; past the end it is Chase forever
    fn phase(&self, index: usize) -> (GlobalMode, f32) {
        match self.schedule.get(index) {
            Some(&duration) if index % 2 == 0 => (GlobalMode::Scatter, duration),
            Some(&duration) => (GlobalMode::Chase, duration),
            None => (GlobalMode::Chase, f32::INFINITY),
        }
    }

    #[inline]
    pub fn mode(&self) -> GlobalMode {
        self.mode
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    #[inline]
    pub fn is_starting(&self) -> bool {
        self.starting
    }

    /// Seconds left on the start countdown
    pub fn start_remaining(&self) -> f32 {
        self.start_remaining
    }

    /// Advance the countdown or the mode timer.
    ///
    /// While the countdown runs, the tick that finishes it is still gated.
    pub fn update(&mut self, dt: f32, pursuers: &mut [Pursuer]) -> DirectorStep {
        if self.starting {
            self.start_remaining -= dt;
            if self.start_remaining <= 0.0 {
                self.start_remaining = 0.0;
                self.starting = false;
                log::debug!("start countdown finished");
            }
            return DirectorStep::Gated;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            if self.mode == GlobalMode::Frightened {
                self.end_fright(pursuers);
            } else {
                self.advance_phase();
            }
        }
        DirectorStep::Running
    }

    fn advance_phase(&mut self) {
        self.phase_index += 1;
        let (mode, duration) = self.phase(self.phase_index);
        log::debug!("phase {} -> {:?} for {}s", self.phase_index, mode, duration);
        self.mode = mode;
        self.duration = duration;
        self.elapsed = 0.0;
    }

    /// Start (or restart) a fright. The schedule position is saved only
    /// when not already frightened, so chained power pellets keep the
    /// original phase.
    pub fn trigger_fright(&mut self, pursuers: &mut [Pursuer]) {
        if self.mode != GlobalMode::Frightened {
            self.saved = Some(PhaseSnapshot {
                mode: self.mode,
                elapsed: self.elapsed,
                duration: self.duration,
            });
        }
        self.mode = GlobalMode::Frightened;
        self.elapsed = 0.0;
        self.duration = self.fright_duration;
        log::debug!("fright for {}s", self.fright_duration);
        for p in pursuers.iter_mut() {
            p.set_frightened(true);
        }
    }

    fn end_fright(&mut self, pursuers: &mut [Pursuer]) {
        let saved = self.saved.take().unwrap_or_else(|| {
            let (mode, duration) = self.phase(self.phase_index);
            PhaseSnapshot {
                mode,
                elapsed: 0.0,
                duration,
            }
        });
        self.mode = saved.mode;
        self.elapsed = saved.elapsed;
        self.duration = saved.duration;
        log::debug!("fright over, back to {:?}", self.mode);
        for p in pursuers.iter_mut() {
            p.set_global_mode(self.mode);
            p.set_frightened(false);
        }
    }

    /// Chase target for pursuer `index` from the player's position and heading
    pub fn chase_target_for(&self, index: usize, player: &Player, pursuers: &[Pursuer]) -> Vec2 {
        let Some(pursuer) = pursuers.get(index) else {
            return player.pos();
        };
        let reference_pos = pursuer.strategy.reference().and_then(|r| pursuers.get(r)).map(Pursuer::pos);
        let ctx = TargetContext {
            player_pos: player.pos(),
            player_vel: player.vel(),
            self_pos: pursuer.pos(),
            home: pursuer.home(),
            reference_pos,
        };
        pursuer.strategy.target(&ctx)
    }

    /// True when pursuer `index` has waited long enough to leave the pen
    pub fn release_due(&self, index: usize, eaten: u32, releasing_in_progress: bool) -> bool {
        if self.serial_release && releasing_in_progress {
            return false;
        }
        self.release_thresholds.get(index).is_some_and(|&threshold| eaten >= threshold)
    }

    /// Pursuer speed multiplier; first matching rule wins
    pub fn pursuer_multiplier(&self, pursuer: &Pursuer, grid: &Grid) -> f32 {
        let s = &self.speeds;
        let remaining = grid.remaining_items();
        if pursuer.is_captured() {
            s.captured
        } else if pursuer.is_confined() || grid.in_tunnel(pursuer.pos()) {
            s.tunnel
        } else if pursuer.is_frightened() {
            s.frightened
        } else if pursuer.angry && remaining <= s.angry_2.remaining_items {
            s.angry_2.multiplier
        } else if pursuer.angry && remaining <= s.angry_1.remaining_items {
            s.angry_1.multiplier
        } else {
            s.pursuer
        }
    }

    /// Set every actor's speed for this tick
    pub fn assign_speeds(&self, player: &mut Player, pursuers: &mut [Pursuer], grid: &Grid) {
        let s = &self.speeds;
        let player_multiplier = if self.mode == GlobalMode::Frightened {
            s.player_frightened
        } else {
            s.player
        };
        player.mover.speed = s.full * player_multiplier;
        for p in pursuers.iter_mut() {
            p.mover.speed = s.full * self.pursuer_multiplier(p, grid);
        }
    }

    /// Test the player against every pursuer. Frightened pursuers are
    /// captured; any other live contact catches the player. The caller
    /// handles the death sequence.
    pub fn resolve_collisions(&self, player_pos: Vec2, pursuers: &mut [Pursuer]) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();
        for (i, p) in pursuers.iter_mut().enumerate() {
            match classify_contact(player_pos, p.pos(), p.mode()) {
                Contact::Capture => {
                    if p.capture() {
                        outcome.captured.push(i);
                    }
                }
                Contact::Caught => outcome.player_caught = true,
                Contact::None => {}
            }
        }
        outcome
    }
}
