//! Idle/demo mode - a simple AI that plays the game
//!
//! Produces the same `TickInput` a human would, so the simulation cannot tell
//! the difference. Used by the headless runner and by soak tests.

use glam::Vec2;

use super::state::{GamePhase, GameState, PlatformKind};
use super::tick::TickInput;
use crate::ui::Layout;

/// Horizontal distance at which an enemy overhead is worth a shot
const FIRE_LANE: f32 = 30.0;

/// Decide this frame's input from the current state
pub fn autopilot_input(state: &GameState) -> TickInput {
    let layout = Layout::new(&state.tuning);

    match state.phase {
        // Anywhere outside the character row starts a run
        GamePhase::Menu => TickInput::press(Vec2::new(layout.width / 2.0, layout.height * 0.75)),
        GamePhase::GameOver => TickInput::press(layout.retry_button().center()),
        GamePhase::Playing => {
            let player = &state.player;
            let mut input = match landing_target(state) {
                Some(x) => TickInput::steer(Vec2::new(x, player.pos.y)),
                None => TickInput::default(),
            };

            let body = player.rect();
            let enemy_overhead = state.enemies.iter().any(|e| {
                e.pos.y < body.top() && (e.pos.x - body.center().x).abs() < FIRE_LANE
            });
            if enemy_overhead && !player.is_boosted() {
                input.presses.push(layout.fire_button().center());
            }
            input
        }
    }
}

/// Centre x of the best platform to come down on.
///
/// Predicts the apex of the current jump and picks the highest active platform
/// at or below it, preferring anything that is not breakable.
fn landing_target(state: &GameState) -> Option<f32> {
    let player = &state.player;
    let gravity = state.tuning.gravity * player.speed_multiplier;
    let apex = if player.vel.y < 0.0 && gravity > 0.0 {
        player.pos.y - player.vel.y * player.vel.y / (2.0 * gravity)
    } else {
        player.pos.y
    };

    let reachable = || {
        state
            .platforms
            .iter()
            .filter(move |p| p.active && p.rect.top() >= apex)
    };
    let pick = |solid_only: bool| {
        reachable()
            .filter(|p| !solid_only || p.kind != PlatformKind::Breakable)
            .min_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))
            .map(|p| p.rect.center().x)
    };
    pick(true).or_else(|| pick(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::tick;

    #[test]
    fn test_autopilot_starts_and_retries() {
        let mut state = GameState::new(5);
        let input = autopilot_input(&state);
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);

        crate::sim::tick::end_run(&mut state, crate::sim::GameOverCause::Fell);
        let input = autopilot_input(&state);
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_soak_keeps_invariants() {
        let mut state = GameState::new(2024);
        let mut last_score = 0;
        for _ in 0..5_000 {
            let input = autopilot_input(&state);
            let snap = tick(&mut state, &input);
            if snap.events.contains(&crate::sim::GameEvent::RunStarted) {
                last_score = 0;
            }
            assert!(snap.score >= last_score);
            last_score = snap.score;

            let x = state.player.pos.x;
            assert!(x >= 0.0 && x < state.tuning.width);
            if state.phase == GamePhase::Playing {
                assert_eq!(state.platforms.len(), state.tuning.window_size + 1);
            }
        }
        assert!(state.high_score > 0 || state.player.score > 0);
    }
}
