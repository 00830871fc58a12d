//! Player-vs-pursuer contact
//!
//! Both actors are axis-aligned squares. The player covers its whole tile;
//! pursuers use a slightly smaller box centered in their tile so that
//! grazing a corner while turning does not count as contact.

use glam::Vec2;

use super::pursuer::PursuerMode;
use super::rect::Rect;
use crate::consts::{PLAYER_FOOTPRINT, PURSUER_FOOTPRINT};

/// Result of touching a pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No overlap, or overlap with a pursuer already heading home
    None,
    /// Frightened pursuer: the player eats it
    Capture,
    /// Dangerous pursuer: the player dies
    Caught,
}

/// Player collision box
#[inline]
pub fn player_footprint(pos: Vec2) -> Rect {
    Rect::square(pos, PLAYER_FOOTPRINT)
}

/// Pursuer collision box, centered in its tile
#[inline]
pub fn pursuer_footprint(pos: Vec2) -> Rect {
    let inset = (1.0 - PURSUER_FOOTPRINT) * 0.5;
    Rect::square(pos + Vec2::splat(inset), PURSUER_FOOTPRINT)
}

pub fn actors_overlap(player_pos: Vec2, pursuer_pos: Vec2) -> bool {
    player_footprint(player_pos).overlaps(&pursuer_footprint(pursuer_pos))
}

/// Decide what touching a pursuer in `mode` does.
///
/// Captured pursuers are harmless and cannot be captured again until they
/// have been back to the pen.
pub fn classify_contact(player_pos: Vec2, pursuer_pos: Vec2, mode: PursuerMode) -> Contact {
    if !actors_overlap(player_pos, pursuer_pos) {
        return Contact::None;
    }
    match mode {
        PursuerMode::Frightened => Contact::Capture,
        PursuerMode::Captured => Contact::None,
        _ => Contact::Caught,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_tiles_do_not_touch() {
        let player = Vec2::new(13.0, 7.0);
        assert!(!actors_overlap(player, Vec2::new(14.0, 7.0)));
        assert!(!actors_overlap(player, Vec2::new(13.0, 8.0)));
        assert!(actors_overlap(player, Vec2::new(13.0, 7.0)));
    }

    #[test]
    fn test_closing_in_touches() {
        let player = Vec2::new(13.0, 7.0);
        // pursuer box starts 0.1 into its tile
        assert!(!actors_overlap(player, Vec2::new(13.92, 7.0)));
        assert!(actors_overlap(player, Vec2::new(13.85, 7.0)));
    }

    #[test]
    fn test_contact_by_mode() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(classify_contact(p, p, PursuerMode::Frightened), Contact::Capture);
        assert_eq!(classify_contact(p, p, PursuerMode::Captured), Contact::None);
        assert_eq!(classify_contact(p, p, PursuerMode::Chase), Contact::Caught);
        assert_eq!(classify_contact(p, p, PursuerMode::Scatter), Contact::Caught);
        assert_eq!(
            classify_contact(p, Vec2::new(9.0, 5.0), PursuerMode::Chase),
            Contact::None
        );
    }
}
