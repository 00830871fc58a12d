//! Frame-time accumulator for driving the fixed-step tick
//!
//! Hosts call `advance` once per rendered frame with the wall-clock delta
//! and run `tick` that many times with `SIM_DT`.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Add a frame's worth of time and return how many fixed steps to run.
    ///
    /// Long frames are clamped and at most `MAX_SUBSTEPS` steps are handed
    /// out, so a stall never snowballs into a longer one.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Leftover time as a fraction of one step (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).min(1.0)
    }

    /// Drop banked time (after a pause or a level change)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_hz_frames_run_two_steps() {
        let mut clock = FixedTimestep::new();
        let total: u32 = (0..60).map(|_| clock.advance(1.0 / 60.0)).sum();
        assert!((119..=120).contains(&total));
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert!(clock.alpha() > 0.4);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
    }

    #[test]
    fn test_negative_frame_ignored() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
