//! Per-frame motion integration
//!
//! Explicit Euler with a fixed timestep of one frame. Nothing here looks at
//! other entities; overlaps are resolved later in the frame.

use glam::Vec2;

use super::state::{Bullet, Enemy, Platform, PlatformKind, Player};
use crate::tuning::{ControlMode, Tuning};
use crate::{shortest_dx, wrap_x};

/// Velocity below which the sprite keeps facing right
const FACING_THRESHOLD: f32 = 0.1;

/// Advance the player one frame.
///
/// `target_x` is the pointer position while steering, ignored during a boost.
pub fn advance_player(player: &mut Player, target_x: Option<f32>, tuning: &Tuning) {
    player.prev_y = player.pos.y;

    if player.boost_timer > tuning.boost_decay_frames {
        // Full thrust: pinned ascent, continuous spin
        player.vel.y = tuning.boost_thrust_velocity;
        player.boost_timer -= 1;
        player.angle += tuning.boost_spin;
        player.pos += player.vel;
    } else if player.boost_timer > 0 {
        // Decay: heavier gravity, spin unwinds toward upright
        player.vel.y += tuning.boost_decay_gravity;
        player.boost_timer -= 1;
        player.angle = player.angle.rem_euclid(360.0);
        if player.angle > 0.0 {
            player.angle = (player.angle - tuning.boost_unspin).max(0.0);
        }
        player.pos += player.vel;
    } else {
        let mult = player.speed_multiplier;
        let before = player.vel;

        player.vel.x = steer(player.vel.x, player.pos.x, target_x, mult, tuning);
        player.vel.y += tuning.gravity * mult;

        // Half-acceleration term for a midpoint position update
        let acc = player.vel - before;
        player.pos += player.vel + 0.5 * acc;

        let target_angle = -player.vel.x * tuning.tilt_factor;
        player.angle += (target_angle - player.angle) * tuning.tilt_ease;
    }

    player.pos.x = wrap_x(player.pos.x, tuning.width);
    player.facing_left = player.vel.x < -FACING_THRESHOLD;
}

/// New horizontal velocity for the gravity phase
fn steer(vx: f32, x: f32, target_x: Option<f32>, mult: f32, tuning: &Tuning) -> f32 {
    let limit = tuning.max_run_speed * mult;
    let Some(target) = target_x else {
        return vx * tuning.friction;
    };
    let dx = shortest_dx(x, target, tuning.width);

    let vx = match tuning.control {
        ControlMode::Track => {
            let mut vx = vx;
            if dx.abs() > tuning.dead_zone {
                vx += tuning.run_accel * dx.signum() * mult;
            }
            vx * tuning.friction
        }
        ControlMode::Proportional => dx * tuning.proportional_gain,
    };
    vx.clamp(-limit, limit)
}

/// Slide a moving platform, bouncing between the screen edges
pub fn advance_platform(platform: &mut Platform, mult: f32, width: f32) {
    if platform.kind != PlatformKind::Moving {
        return;
    }
    platform.rect.x += platform.vx * mult;
    if platform.rect.left() <= 0.0 {
        platform.rect.x = 0.0;
        platform.vx = platform.vx.abs();
    } else if platform.rect.right() >= width {
        platform.rect.x = width - platform.rect.w;
        platform.vx = -platform.vx.abs();
    }
}

/// Sway an enemy sideways along a sine curve
pub fn advance_enemy(enemy: &mut Enemy, frame: u64, tuning: &Tuning) {
    let t = frame as f32 * tuning.enemy_sway_rate + enemy.phase;
    enemy.pos.x += t.sin() * tuning.enemy_sway;
}

pub fn advance_bullet(bullet: &mut Bullet) {
    bullet.pos += Vec2::new(0.0, bullet.vel_y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::Modifier;

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_gravity_accumulates() {
        let (mut p, tuning) = player();
        let y0 = p.pos.y;
        advance_player(&mut p, None, &tuning);
        assert!((p.vel.y - tuning.gravity).abs() < 1e-5);
        // v + a/2 with v = a after the first step
        assert!((p.pos.y - (y0 + 1.5 * tuning.gravity)).abs() < 1e-4);
        assert_eq!(p.prev_y, y0);
    }

    #[test]
    fn test_gravity_scales_with_multiplier() {
        let (mut p, tuning) = player();
        p.speed_multiplier = 2.0;
        advance_player(&mut p, None, &tuning);
        assert!((p.vel.y - 2.0 * tuning.gravity).abs() < 1e-5);
    }

    #[test]
    fn test_tracking_respects_dead_zone() {
        let (mut p, tuning) = player();
        let x = p.pos.x;
        advance_player(&mut p, Some(x + tuning.dead_zone * 0.5), &tuning);
        assert_eq!(p.vel.x, 0.0);

        let target = p.pos.x + 100.0;
        advance_player(&mut p, Some(target), &tuning);
        assert!(p.vel.x > 0.0);
    }

    #[test]
    fn test_tracking_speed_is_clamped() {
        let (mut p, tuning) = player();
        for _ in 0..200 {
            let target = wrap_x(p.pos.x + 150.0, tuning.width);
            advance_player(&mut p, Some(target), &tuning);
            p.vel.y = 0.0;
            assert!(p.vel.x.abs() <= tuning.max_run_speed * p.speed_multiplier + 1e-4);
        }
    }

    #[test]
    fn test_tracking_takes_short_way_across_seam() {
        let (mut p, tuning) = player();
        p.pos.x = tuning.width - 5.0;
        advance_player(&mut p, Some(20.0), &tuning);
        // Target is 25 px to the right through the seam
        assert!(p.vel.x > 0.0);
    }

    #[test]
    fn test_proportional_mode() {
        let tuning = Tuning {
            control: ControlMode::Proportional,
            ..Default::default()
        };
        let mut p = Player::new(&tuning);
        let x = p.pos.x;
        advance_player(&mut p, Some(x + 40.0), &tuning);
        assert!((p.vel.x - 40.0 * tuning.proportional_gain).abs() < 1e-4);
    }

    #[test]
    fn test_position_wraps() {
        let (mut p, tuning) = player();
        p.pos.x = tuning.width - 1.0;
        p.vel.x = 5.0;
        advance_player(&mut p, None, &tuning);
        assert!(p.pos.x >= 0.0 && p.pos.x < tuning.width);
        assert!(p.pos.x < 10.0);
    }

    #[test]
    fn test_boost_thrust_then_decay() {
        let (mut p, tuning) = player();
        p.boost_timer = tuning.boost_total_frames();
        p.vel.y = 10.0;
        advance_player(&mut p, Some(0.0), &tuning);
        assert_eq!(p.vel.y, tuning.boost_thrust_velocity);
        assert_eq!(p.angle, tuning.boost_spin);
        assert_eq!(p.vel.x, 0.0);

        for _ in 1..tuning.boost_thrust_frames {
            advance_player(&mut p, None, &tuning);
        }
        assert_eq!(p.boost_timer, tuning.boost_decay_frames);
        assert_eq!(p.vel.y, tuning.boost_thrust_velocity);

        advance_player(&mut p, None, &tuning);
        assert!((p.vel.y - (tuning.boost_thrust_velocity + tuning.boost_decay_gravity)).abs() < 1e-4);

        for _ in 1..tuning.boost_decay_frames {
            advance_player(&mut p, None, &tuning);
        }
        assert_eq!(p.boost_timer, 0);
        assert!(p.angle >= 0.0 && p.angle < 360.0);
    }

    #[test]
    fn test_tilt_eases_into_turns() {
        let (mut p, tuning) = player();
        p.vel.x = 5.0;
        advance_player(&mut p, None, &tuning);
        assert!(p.angle < 0.0);
    }

    #[test]
    fn test_facing_flips_when_moving_left() {
        let (mut p, tuning) = player();
        p.vel.x = -3.0;
        advance_player(&mut p, None, &tuning);
        assert!(p.facing_left);
    }

    #[test]
    fn test_moving_platform_bounces_off_edges() {
        let mut platform = Platform {
            id: 1,
            rect: Rect::new(1.0, 100.0, 75.0, 18.0),
            kind: PlatformKind::Moving,
            active: true,
            modifier: Modifier::None,
            vx: -2.0,
        };
        advance_platform(&mut platform, 1.0, 360.0);
        assert_eq!(platform.rect.x, 0.0);
        assert!(platform.vx > 0.0);

        platform.rect.x = 360.0 - 75.0 - 1.0;
        advance_platform(&mut platform, 1.5, 360.0);
        assert_eq!(platform.rect.right(), 360.0);
        assert!(platform.vx < 0.0);
    }

    #[test]
    fn test_static_platform_does_not_move() {
        let mut platform = Platform {
            id: 1,
            rect: Rect::new(50.0, 100.0, 75.0, 18.0),
            kind: PlatformKind::Normal,
            active: true,
            modifier: Modifier::None,
            vx: 2.0,
        };
        advance_platform(&mut platform, 1.0, 360.0);
        assert_eq!(platform.rect.x, 50.0);
    }
}
