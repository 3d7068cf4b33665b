//! Fixed timestep simulation tick
//!
//! One call per host frame. Press events are handled first. While a run is
//! active the frame then integrates motion, scrolls the camera, recycles
//! platforms, resolves collisions and finally checks whether the run ended.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, GameEvent, GameOverCause, GamePhase, GameState};
use super::{camera, collision, generator, kinematics};
use crate::ui::Layout;

/// Input sampled by the host for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world coordinates
    pub pointer: Vec2,
    /// Pointer button held this frame
    pub pressed: bool,
    /// Press events since the previous tick, oldest first
    pub presses: Vec<Vec2>,
}

impl TickInput {
    /// Hold the pointer at `pointer`
    pub fn steer(pointer: Vec2) -> Self {
        Self {
            pointer,
            pressed: true,
            presses: Vec::new(),
        }
    }

    /// A single press at `point`
    pub fn press(point: Vec2) -> Self {
        Self {
            pointer: point,
            pressed: true,
            presses: vec![point],
        }
    }
}

/// What the host needs after a tick, besides read access to the state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub frame: u64,
    pub score: u64,
    /// Includes the run in progress
    pub high_score: u64,
    pub speed_multiplier: f32,
    pub boost_timer: u32,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            frame: state.frame,
            score: state.player.score,
            high_score: state.display_high_score(),
            speed_multiplier: state.player.speed_multiplier,
            boost_timer: state.player.boost_timer,
            events: state.events.clone(),
        }
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    state.events.clear();
    let layout = Layout::new(&state.tuning);

    for &point in &input.presses {
        handle_press(state, &layout, point);
    }

    if state.phase == GamePhase::Playing {
        simulate(state, input, &layout);
    }

    Snapshot::capture(state)
}

/// Route a press according to the current phase
fn handle_press(state: &mut GameState, layout: &Layout, point: Vec2) {
    match state.phase {
        GamePhase::Menu => {
            if let Some(index) = layout.character_at(point) {
                state.selected_character = index;
                state.events.push(GameEvent::CharacterSelected { index });
            } else {
                start_run(state);
            }
        }
        GamePhase::Playing => {
            if layout.fire_button().contains_point(point) {
                fire(state);
            }
        }
        GamePhase::GameOver => {
            if layout.retry_button().contains_point(point) {
                start_run(state);
            } else if layout.menu_button().contains_point(point) {
                state.phase = GamePhase::Menu;
                state.events.push(GameEvent::ReturnedToMenu);
                log::info!("Back to menu");
            }
        }
    }
}

/// Reset every pool and begin a new run
pub fn start_run(state: &mut GameState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::RunStarted);
    log::info!(
        "Run started (character {}, high score {})",
        state.selected_character,
        state.high_score
    );
}

/// End the run and fold its score into the high score
pub fn end_run(state: &mut GameState, cause: GameOverCause) {
    state.phase = GamePhase::GameOver;
    state.record_high_score();
    state.events.push(GameEvent::GameOver { cause });
    log::info!(
        "Game over ({:?}) score={} high={} frames={}",
        cause,
        state.player.score,
        state.high_score,
        state.frame
    );
}

/// Fire a bullet from the top of the player; not allowed while boosted
fn fire(state: &mut GameState) {
    if state.player.is_boosted() {
        return;
    }
    let body = state.player.rect();
    let id = state.next_entity_id();
    let tuning = &state.tuning;
    state.bullets.push(Bullet {
        id,
        pos: Vec2::new(body.center().x, body.top()),
        vel_y: tuning.bullet_velocity,
        width: tuning.bullet_width,
        height: tuning.bullet_height,
    });
    state.events.push(GameEvent::BulletFired { bullet_id: id });
}

/// Pointer steers only while held and not over the fire button
fn steering_target(input: &TickInput, layout: &Layout) -> Option<f32> {
    (input.pressed && !layout.fire_button().contains_point(input.pointer)).then_some(input.pointer.x)
}

fn simulate(state: &mut GameState, input: &TickInput, layout: &Layout) {
    state.frame += 1;

    // Kinematics
    state.player.speed_multiplier =
        generator::difficulty_multiplier(state.player.score, &state.tuning);
    let target_x = steering_target(input, layout);
    kinematics::advance_player(&mut state.player, target_x, &state.tuning);

    let mult = state.player.speed_multiplier;
    let width = state.tuning.width;
    for platform in &mut state.platforms {
        kinematics::advance_platform(platform, mult, width);
    }
    for enemy in &mut state.enemies {
        kinematics::advance_enemy(enemy, state.frame, &state.tuning);
    }
    for bullet in &mut state.bullets {
        kinematics::advance_bullet(bullet);
    }

    // Camera
    let shift = camera::compute_shift(
        state.player.rect().top(),
        state.tuning.height,
        state.tuning.camera_damping,
    );
    camera::apply_shift(state, shift);

    // Generator
    generator::recycle_platforms(state);
    generator::cull_offscreen(state);

    // Collisions
    collision::resolve_landing(state);
    collision::collect_booster(state);
    collision::resolve_bullet_hits(state);

    // Terminal checks
    if collision::touches_enemy(state) {
        end_run(state, GameOverCause::Enemy);
    } else if collision::fell_out(&state.player, state.tuning.height) {
        end_run(state, GameOverCause::Fell);
    }
}
