//! Collision detection and response
//!
//! All checks run after kinematics and camera scroll, on the positions the
//! frame will be drawn with.

use super::state::{GameEvent, GameState, PlatformKind, Player};

/// Land on at most one platform this frame.
///
/// Only a descending player can land. A platform qualifies when it is active,
/// overlaps the player horizontally and either the feet end the frame within
/// `landing_tolerance` of its top edge, or the feet crossed that edge this
/// frame having started no more than `landing_tolerance` below it. The
/// topmost qualifying platform wins. Returns the landed platform's id.
pub fn resolve_landing(state: &mut GameState) -> Option<u32> {
    let player = &state.player;
    if player.vel.y <= 0.0 {
        return None;
    }

    let body = player.rect();
    let prev_bottom = player.prev_y;
    let bottom = player.pos.y;
    let tolerance = state.tuning.landing_tolerance;

    let index = state
        .platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.active && body.overlaps_x(&p.rect))
        .filter(|(_, p)| {
            let top = p.rect.top();
            let near = (bottom - top).abs() <= tolerance;
            let crossed = prev_bottom <= top + tolerance && bottom >= top;
            near || crossed
        })
        .min_by(|(_, a), (_, b)| a.rect.top().total_cmp(&b.rect.top()))
        .map(|(i, _)| i)?;

    let tuning = &state.tuning;
    let platform = &mut state.platforms[index];
    let spring = platform.has_spring();
    let impulse = if spring {
        tuning.spring_impulse
    } else {
        tuning.jump_impulse
    };
    state.player.vel.y = jump_velocity(impulse, &state.player, tuning.jump_damping);

    let platform_id = platform.id;
    state.events.push(GameEvent::Landed { platform_id, spring });
    if platform.kind == PlatformKind::Breakable {
        platform.active = false;
        state.events.push(GameEvent::PlatformBroken { platform_id });
    }
    Some(platform_id)
}

/// Jump velocity scaled sub-linearly with difficulty
pub fn jump_velocity(impulse: f32, player: &Player, damping: f32) -> f32 {
    impulse * player.speed_multiplier.powf(damping)
}

/// Collect one booster touched while descending, starting a boost
pub fn collect_booster(state: &mut GameState) -> bool {
    if state.player.vel.y <= 0.0 {
        return false;
    }
    let body = state.player.rect();
    let Some(index) = state.boosters.iter().position(|b| body.overlaps(&b.rect())) else {
        return false;
    };

    let booster = state.boosters.remove(index);
    state.player.boost_timer = state.tuning.boost_total_frames();
    state.events.push(GameEvent::BoostCollected {
        booster_id: booster.id,
    });
    log::debug!("Boost collected ({} frames)", state.player.boost_timer);
    true
}

/// Whether an unboosted player is touching any enemy
pub fn touches_enemy(state: &GameState) -> bool {
    if state.player.is_boosted() {
        return false;
    }
    let body = state.player.rect();
    state.enemies.iter().any(|e| body.overlaps(&e.rect()))
}

/// Remove every overlapping bullet/enemy pair; each bullet takes at most one enemy
pub fn resolve_bullet_hits(state: &mut GameState) -> usize {
    let mut hits = 0;
    let mut b = 0;
    while b < state.bullets.len() {
        let shot = state.bullets[b].rect();
        match state.enemies.iter().position(|e| shot.overlaps(&e.rect())) {
            Some(e) => {
                let enemy = state.enemies.remove(e);
                let bullet = state.bullets.remove(b);
                state.events.push(GameEvent::EnemyDestroyed {
                    enemy_id: enemy.id,
                    bullet_id: bullet.id,
                });
                hits += 1;
            }
            None => b += 1,
        }
    }
    hits
}

/// The whole body has dropped below the bottom edge of the screen
pub fn fell_out(player: &Player, height: f32) -> bool {
    player.rect().top() > height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Booster, Bullet, Enemy, Modifier, Platform};
    use glam::Vec2;

    fn arena() -> GameState {
        let mut state = GameState::new(1);
        state.reset_run();
        state.platforms.clear();
        state.boosters.clear();
        state.enemies.clear();
        state
    }

    fn platform(state: &mut GameState, y: f32, kind: PlatformKind, modifier: Modifier) -> u32 {
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            rect: Rect::new(150.0, y, 75.0, 18.0),
            kind,
            active: true,
            modifier,
            vx: 0.0,
        });
        id
    }

    fn falling_onto(state: &mut GameState, top: f32) {
        state.player.pos = Vec2::new(180.0, top + 4.0);
        state.player.prev_y = top - 2.0;
        state.player.vel = Vec2::new(0.0, 6.0);
    }

    #[test]
    fn test_landing_sets_jump_impulse() {
        let mut state = arena();
        let id = platform(&mut state, 500.0, PlatformKind::Normal, Modifier::None);
        falling_onto(&mut state, 500.0);

        assert_eq!(resolve_landing(&mut state), Some(id));
        assert_eq!(state.player.vel.y, state.tuning.jump_impulse);
    }

    #[test]
    fn test_spring_launches_higher() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Normal, Modifier::Spring);
        falling_onto(&mut state, 500.0);

        resolve_landing(&mut state);
        assert_eq!(state.player.vel.y, state.tuning.spring_impulse);
        assert!(state.events.contains(&GameEvent::Landed {
            platform_id: state.platforms[0].id,
            spring: true
        }));
    }

    #[test]
    fn test_jump_scales_sublinearly() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Normal, Modifier::None);
        falling_onto(&mut state, 500.0);
        state.player.speed_multiplier = 2.0;

        resolve_landing(&mut state);
        let v = state.player.vel.y;
        assert!(v < state.tuning.jump_impulse);
        assert!(v > 2.0 * state.tuning.jump_impulse);
    }

    #[test]
    fn test_landing_just_above_top() {
        let mut state = arena();
        let id = platform(&mut state, 510.0, PlatformKind::Normal, Modifier::None);
        // Feet still short of the top but inside the tolerance band
        state.player.pos = Vec2::new(180.0, 505.9);
        state.player.prev_y = 500.0;
        state.player.vel = Vec2::new(0.0, 5.6);

        assert_eq!(resolve_landing(&mut state), Some(id));
        assert_eq!(state.player.vel.y, state.tuning.jump_impulse);
    }

    #[test]
    fn test_no_landing_far_above_top() {
        let mut state = arena();
        platform(&mut state, 510.0, PlatformKind::Normal, Modifier::None);
        state.player.pos = Vec2::new(180.0, 480.0);
        state.player.prev_y = 475.0;
        state.player.vel = Vec2::new(0.0, 5.0);
        assert_eq!(resolve_landing(&mut state), None);
    }

    #[test]
    fn test_no_landing_while_ascending() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Normal, Modifier::None);
        falling_onto(&mut state, 500.0);
        state.player.vel.y = -3.0;
        assert_eq!(resolve_landing(&mut state), None);
        assert_eq!(state.player.vel.y, -3.0);
    }

    #[test]
    fn test_no_landing_from_below() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Normal, Modifier::None);
        // Feet started well below the top: passing up through the side
        state.player.pos = Vec2::new(180.0, 530.0);
        state.player.prev_y = 525.0;
        state.player.vel = Vec2::new(0.0, 5.0);
        assert_eq!(resolve_landing(&mut state), None);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Normal, Modifier::None);
        falling_onto(&mut state, 500.0);
        state.player.pos.x = 20.0;
        assert_eq!(resolve_landing(&mut state), None);
    }

    #[test]
    fn test_single_landing_with_overlapping_platforms() {
        let mut state = arena();
        let upper = platform(&mut state, 500.0, PlatformKind::Breakable, Modifier::None);
        let lower = platform(&mut state, 505.0, PlatformKind::Breakable, Modifier::None);
        falling_onto(&mut state, 500.0);
        state.player.pos.y = 510.0;

        assert_eq!(resolve_landing(&mut state), Some(upper));
        let landings = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Landed { .. }))
            .count();
        assert_eq!(landings, 1);
        let lower = state.platforms.iter().find(|p| p.id == lower).unwrap();
        assert!(lower.active);
    }

    #[test]
    fn test_breakable_is_one_shot() {
        let mut state = arena();
        platform(&mut state, 500.0, PlatformKind::Breakable, Modifier::None);
        falling_onto(&mut state, 500.0);

        assert!(resolve_landing(&mut state).is_some());
        assert!(!state.platforms[0].active);

        falling_onto(&mut state, 500.0);
        assert_eq!(resolve_landing(&mut state), None);
        assert_eq!(state.player.vel.y, 6.0);
    }

    #[test]
    fn test_booster_pickup_only_when_descending() {
        let mut state = arena();
        let id = state.next_entity_id();
        state.boosters.push(Booster {
            id,
            pos: Vec2::new(180.0, 470.0),
            width: 30.0,
            height: 45.0,
        });
        state.player.pos = Vec2::new(180.0, 500.0);
        state.player.vel.y = -4.0;
        assert!(!collect_booster(&mut state));

        state.player.vel.y = 4.0;
        assert!(collect_booster(&mut state));
        assert!(state.boosters.is_empty());
        assert_eq!(state.player.boost_timer, state.tuning.boost_total_frames());
    }

    #[test]
    fn test_boost_grants_invulnerability() {
        let mut state = arena();
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: Vec2::new(180.0, 460.0),
            phase: 0.0,
            size: 50.0,
        });
        state.player.pos = Vec2::new(180.0, 500.0);

        state.player.boost_timer = 10;
        assert!(!touches_enemy(&state));

        state.player.boost_timer = 0;
        assert!(touches_enemy(&state));
    }

    #[test]
    fn test_bullet_destroys_one_enemy() {
        let mut state = arena();
        for x in [100.0, 110.0] {
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                pos: Vec2::new(x, 200.0),
                phase: 0.0,
                size: 50.0,
            });
        }
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(105.0, 210.0),
            vel_y: -22.0,
            width: 4.0,
            height: 25.0,
        });

        assert_eq!(resolve_bullet_hits(&mut state), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_fell_out() {
        let mut state = arena();
        let body = state.player.height;
        // Feet past the edge, head still on screen
        state.player.pos.y = 641.0;
        assert!(!fell_out(&state.player, 640.0));
        state.player.pos.y = 640.0 + body;
        assert!(!fell_out(&state.player, 640.0));
        state.player.pos.y = 641.0 + body;
        assert!(fell_out(&state.player, 640.0));
    }
}
