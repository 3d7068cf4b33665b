//! Procedural level generation
//!
//! Keeps a fixed-size window of platforms above the player. Every platform
//! that drops below the screen is replaced by a new one above the topmost,
//! which is also what drives the score and the difficulty curve.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Booster, Enemy, GameEvent, GameState, Modifier, Platform, PlatformKind};
use crate::tuning::Tuning;

/// Difficulty multiplier for a score: flat until `difficulty_start`, then one
/// step of `difficulty_increment` every `difficulty_step` points
pub fn difficulty_multiplier(score: u64, tuning: &Tuning) -> f32 {
    let steps = score.saturating_sub(tuning.difficulty_start) / tuning.difficulty_step.max(1);
    1.0 + steps as f32 * tuning.difficulty_increment
}

/// Uniform draw in `[lo, hi]`, collapsing to the midpoint for an empty range
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// Bernoulli draw that tolerates out-of-range probabilities
fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Weighted platform kind draw
pub fn roll_kind(rng: &mut impl Rng, tuning: &Tuning) -> PlatformKind {
    let roll: f64 = rng.random();
    if roll < tuning.breakable_chance {
        PlatformKind::Breakable
    } else if roll < tuning.breakable_chance + tuning.moving_chance {
        PlatformKind::Moving
    } else {
        PlatformKind::Normal
    }
}

/// Create a randomised platform with its top edge at `y`.
///
/// A booster modifier also spawns the pickup above it.
pub fn spawn_platform(state: &mut GameState, y: f32) -> u32 {
    let tuning = &state.tuning;
    let rng = &mut state.rng;

    let width = tuning.platform_width;
    let x = uniform(rng, 0.0, tuning.width - width);
    let kind = roll_kind(rng, tuning);
    let vx = if kind == PlatformKind::Moving {
        if rng.random_bool(0.5) {
            tuning.moving_speed
        } else {
            -tuning.moving_speed
        }
    } else {
        0.0
    };

    let modifier = if kind != PlatformKind::Normal {
        Modifier::None
    } else if width < tuning.spring_max_platform_width && chance(rng, tuning.spring_chance) {
        Modifier::Spring
    } else if chance(rng, tuning.booster_chance) {
        Modifier::Booster
    } else {
        Modifier::None
    };

    let rect = Rect::new(x, y, width, tuning.platform_height);
    let booster_size = (tuning.booster_width, tuning.booster_height);
    let booster_center = Vec2::new(rect.center().x, rect.top() - tuning.booster_lift);

    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        rect,
        kind,
        active: true,
        modifier,
        vx,
    });

    if modifier == Modifier::Booster {
        let booster_id = state.next_entity_id();
        state.boosters.push(Booster {
            id: booster_id,
            pos: booster_center,
            width: booster_size.0,
            height: booster_size.1,
        });
    }

    id
}

/// Seed the initial window: a full-width safe platform under the player, then
/// `window_size` random platforms stacked upward
pub fn seed_window(state: &mut GameState) {
    let (width, height) = (state.tuning.width, state.tuning.height);
    let safe_id = state.next_entity_id();
    state.platforms.push(Platform {
        id: safe_id,
        rect: Rect::new(
            0.0,
            height - state.tuning.safe_platform_offset,
            width,
            state.tuning.platform_height,
        ),
        kind: PlatformKind::Normal,
        active: true,
        modifier: Modifier::None,
        vx: 0.0,
    });

    let mut y = height - state.tuning.first_row_offset;
    for _ in 0..state.tuning.window_size {
        spawn_platform(state, y);
        y -= state.tuning.platform_gap;
    }
    log::debug!("Seeded {} platforms", state.platforms.len());
}

/// Spawn an enemy above the screen with probability `enemy_chance`
pub fn maybe_spawn_enemy(state: &mut GameState) {
    let tuning = &state.tuning;
    if !chance(&mut state.rng, tuning.enemy_chance) {
        return;
    }
    let margin = tuning.enemy_spawn_margin;
    let x = uniform(&mut state.rng, margin, tuning.width - margin);
    let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
    let pos = Vec2::new(x, tuning.enemy_spawn_y);
    let size = tuning.enemy_size;

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        phase,
        size,
    });
    state.events.push(GameEvent::EnemySpawned { enemy_id: id });
    log::debug!("Enemy {} spawned at x={:.0}", id, x);
}

/// Replace every platform whose top edge dropped below the screen.
///
/// Each recycle keeps the platform count constant, awards one point and may
/// spawn an enemy. Returns the number of platforms recycled.
pub fn recycle_platforms(state: &mut GameState) -> usize {
    let height = state.tuning.height;
    let gap = state.tuning.platform_gap;

    if state.platforms.is_empty() {
        log::warn!("Platform pool empty, reseeding");
        seed_window(state);
        return 0;
    }

    let mut recycled = 0;
    let mut i = 0;
    while i < state.platforms.len() {
        if state.platforms[i].rect.top() <= height {
            i += 1;
            continue;
        }

        let removed = state.platforms.remove(i);
        let Some(top_y) = state
            .platforms
            .iter()
            .map(|p| p.rect.y)
            .min_by(|a, b| a.total_cmp(b))
        else {
            log::warn!("Last platform {} left the screen, reseeding", removed.id);
            seed_window(state);
            return recycled;
        };

        let spawned_id = spawn_platform(state, top_y - gap);
        state.player.score += 1;
        state.events.push(GameEvent::PlatformRecycled {
            removed_id: removed.id,
            spawned_id,
        });
        log::debug!(
            "Recycled platform {} -> {} (score {})",
            removed.id,
            spawned_id,
            state.player.score
        );
        maybe_spawn_enemy(state);
        recycled += 1;
    }
    recycled
}

/// Drop enemies, bullets and boosters that left the screen
pub fn cull_offscreen(state: &mut GameState) {
    let height = state.tuning.height;
    state.enemies.retain(|e| e.rect().top() <= height);
    state.bullets.retain(|b| b.rect().bottom() >= 0.0);
    state.boosters.retain(|b| b.rect().top() <= height);
}
