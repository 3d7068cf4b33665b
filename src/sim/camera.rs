//! Upward-only camera scroll
//!
//! There is no camera space: scrolling moves the whole world down by `shift`.

use super::state::GameState;

/// Vertical shift for this frame; zero unless the player is above the midpoint
pub fn compute_shift(player_y: f32, height: f32, damping: f32) -> f32 {
    let midpoint = height / 2.0;
    if player_y < midpoint {
        (midpoint - player_y) * damping
    } else {
        0.0
    }
}

/// Move every world entity down by `shift`, preserving relative positions
pub fn apply_shift(state: &mut GameState, shift: f32) {
    if shift == 0.0 {
        return;
    }
    state.player.pos.y += shift;
    state.player.prev_y += shift;
    for platform in &mut state.platforms {
        platform.rect.y += shift;
    }
    for enemy in &mut state.enemies {
        enemy.pos.y += shift;
    }
    for bullet in &mut state.bullets {
        bullet.pos.y += shift;
    }
    for booster in &mut state.boosters {
        booster.pos.y += shift;
    }
}
