//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The order of
//! the steps below is part of the game's behavior:
//! 1. mode timer
//! 2. speeds
//! 3. player
//! 4. pursuers, in release order
//! 5. tunnel wrap
//! 6. item consumption
//! 7. player-pursuer contact

use super::director::DirectorStep;
use super::motion::Direction;
use super::pursuer::PursuerMode;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New desired direction; `None` keeps the previous one
    pub desired: Option<Direction>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    match state.phase {
        GamePhase::GameOver | GamePhase::Cleared => return,
        GamePhase::Dying { elapsed } => {
            state.time_ticks += 1;
            advance_death(state, elapsed + dt);
            return;
        }
        GamePhase::Playing => {}
    }
    state.time_ticks += 1;

    if let Some(dir) = input.desired {
        state.player.set_desired(dir);
    }

    // 1. Mode timer; the start countdown freezes everything else
    if state.director.update(dt, &mut state.pursuers) == DirectorStep::Gated {
        return;
    }

    // 2. Speeds
    state
        .director
        .assign_speeds(&mut state.player, &mut state.pursuers, &state.grid);

    // 3. Player
    state.player.tick(dt, &state.grid);
    state.player.tick_eating(dt);

    // 4. Pursuers
    let eaten = state.grid.eaten_items();
    let global = state.director.mode();
    for i in 0..state.pursuers.len() {
        let chase_target = state.director.chase_target_for(i, &state.player, &state.pursuers);
        let releasing = state.pursuers.iter().any(|p| p.is_releasing());

        let pursuer = &mut state.pursuers[i];
        pursuer.set_chase_target(chase_target);
        pursuer.set_global_mode(global);
        if pursuer.mode() == PursuerMode::ConfinedWaiting
            && state.director.release_due(i, eaten, releasing)
            && pursuer.release()
        {
            log::debug!("releasing pursuer {i} after {eaten} items");
        }
        pursuer.tick(dt, &state.grid, &mut state.rng);
    }

    // 5. Tunnels
    state.player.mover.wrap_tunnel(&state.grid, PLAYER_TUNNEL_MARGIN);
    for p in &mut state.pursuers {
        p.mover.wrap_tunnel(&state.grid, PURSUER_TUNNEL_MARGIN);
    }

    // 6. Items
    consume_items(state);
    if state.grid.remaining_items() == 0 {
        state.phase = GamePhase::Cleared;
        state.events.push(GameEvent::LevelCleared);
        log::info!("Level {} cleared, score {}", state.level, state.score);
        return;
    }

    // 7. Contact
    resolve_contacts(state);
}

fn consume_items(state: &mut GameState) {
    let pos = state.player.pos();
    if state.grid.consume_pellet_at(pos) {
        state.score += PELLET_POINTS;
        state.player.note_eating();
        state.events.push(GameEvent::PelletEaten);
    }
    if state.grid.consume_super_pellet_at(pos) {
        state.score += POWER_PELLET_POINTS;
        state.player.note_eating();
        state.capture_chain = 0;
        state.director.trigger_fright(&mut state.pursuers);
        state.events.push(GameEvent::PowerPelletEaten);
    }
}

fn resolve_contacts(state: &mut GameState) {
    let outcome = state
        .director
        .resolve_collisions(state.player.pos(), &mut state.pursuers);

    for index in outcome.captured {
        // 200, 400, 800, 1600
        let points = CAPTURE_BASE_POINTS << state.capture_chain.min(3);
        state.capture_chain += 1;
        state.score += points;
        state.events.push(GameEvent::PursuerCaptured { index, points });
        log::debug!("pursuer {index} captured for {points}");
    }

    if outcome.player_caught {
        state.player.mover.stop();
        state.phase = GamePhase::Dying { elapsed: 0.0 };
        state.events.push(GameEvent::PlayerCaught);
        log::info!("Player caught with {} lives left", state.lives);
    }
}

/// Run the death animation, then spend a life
fn advance_death(state: &mut GameState, elapsed: f32) {
    if elapsed < DEATH_DURATION {
        state.phase = GamePhase::Dying { elapsed };
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over, final score {}", state.score);
    } else {
        log::info!("Respawning, {} lives left", state.lives);
        state.respawn_actors();
        state.phase = GamePhase::Playing;
    }
}
