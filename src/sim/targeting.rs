//! Chase-target formulas
//!
//! Each pursuer carries one `ChaseStrategy`. The director evaluates it every
//! tick from the player's position and heading and hands the result to the
//! pursuer as its chase target.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-pursuer chase formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChaseStrategy {
    /// The player's position
    Direct,
    /// A point `lookahead` tiles ahead of the player
    Ambush { lookahead: f32 },
    /// Double the vector from pursuer `reference` to a point `lookahead`
    /// tiles ahead of the player
    Flank { reference: usize, lookahead: f32 },
    /// The home corner while further than `radius` from the player, the
    /// player itself when closer
    Shy { radius: f32 },
}

/// Inputs for one target evaluation
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    /// Position of the pursuer being targeted for
    pub self_pos: Vec2,
    pub home: Vec2,
    /// Position of the `Flank` reference pursuer, if it exists
    pub reference_pos: Option<Vec2>,
}

impl ChaseStrategy {
    pub fn target(&self, ctx: &TargetContext) -> Vec2 {
        let heading = ctx.player_vel.normalize_or_zero();
        match *self {
            ChaseStrategy::Direct => ctx.player_pos,
            ChaseStrategy::Ambush { lookahead } => ctx.player_pos + heading * lookahead,
            ChaseStrategy::Flank { lookahead, .. } => {
                let pivot = ctx.player_pos + heading * lookahead;
                match ctx.reference_pos {
                    Some(reference) => reference + (pivot - reference) * 2.0,
                    None => pivot,
                }
            }
            ChaseStrategy::Shy { radius } => {
                if ctx.self_pos.distance(ctx.player_pos) > radius {
                    ctx.home
                } else {
                    ctx.player_pos
                }
            }
        }
    }

    /// Index of the pursuer this strategy reads, if any
    pub fn reference(&self) -> Option<usize> {
        match *self {
            ChaseStrategy::Flank { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TargetContext {
        TargetContext {
            player_pos: Vec2::new(10.0, 10.0),
            player_vel: Vec2::new(6.0, 0.0),
            self_pos: Vec2::new(20.0, 10.0),
            home: Vec2::new(-1.0, -3.0),
            reference_pos: Some(Vec2::new(12.0, 14.0)),
        }
    }

    #[test]
    fn test_direct() {
        assert_eq!(ChaseStrategy::Direct.target(&ctx()), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_ambush_leads_the_player() {
        let target = ChaseStrategy::Ambush { lookahead: 4.0 }.target(&ctx());
        assert_eq!(target, Vec2::new(14.0, 10.0));
    }

    #[test]
    fn test_ambush_facing_up_has_no_sideways_offset() {
        let mut c = ctx();
        c.player_vel = Vec2::new(0.0, 6.0);
        assert_eq!(ChaseStrategy::Ambush { lookahead: 4.0 }.target(&c), Vec2::new(10.0, 14.0));

        let flank = ChaseStrategy::Flank {
            reference: 0,
            lookahead: 2.0,
        };
        // pivot (10, 12), reference (12, 14)
        assert_eq!(flank.target(&c), Vec2::new(8.0, 10.0));
    }

    #[test]
    fn test_ambush_on_stopped_player() {
        let mut c = ctx();
        c.player_vel = Vec2::ZERO;
        assert_eq!(ChaseStrategy::Ambush { lookahead: 4.0 }.target(&c), c.player_pos);
    }

    #[test]
    fn test_flank_doubles_reference_vector() {
        let strategy = ChaseStrategy::Flank {
            reference: 0,
            lookahead: 2.0,
        };
        // pivot (12, 10), reference (12, 14): mirror through the pivot
        assert_eq!(strategy.target(&ctx()), Vec2::new(12.0, 6.0));
        assert_eq!(strategy.reference(), Some(0));
    }

    #[test]
    fn test_shy_switches_at_radius() {
        let strategy = ChaseStrategy::Shy { radius: 8.0 };
        let far = ctx();
        assert_eq!(strategy.target(&far), far.home);

        let mut near = ctx();
        near.self_pos = Vec2::new(14.0, 10.0);
        assert_eq!(strategy.target(&near), near.player_pos);
    }
}
