//! Game state and core simulation types
//!
//! The session owns every entity. Entities only relate to each other through
//! their positions; nothing holds a reference to anything else.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator;
use super::rect::Rect;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Character selection, no simulation
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Touched an enemy without a boost
    Enemy,
    /// Dropped below the bottom edge
    Fell,
}

/// Things that happened during a tick, for audio/FX layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ReturnedToMenu,
    CharacterSelected { index: usize },
    Landed { platform_id: u32, spring: bool },
    PlatformBroken { platform_id: u32 },
    BoostCollected { booster_id: u32 },
    BulletFired { bullet_id: u32 },
    EnemyDestroyed { enemy_id: u32, bullet_id: u32 },
    EnemySpawned { enemy_id: u32 },
    PlatformRecycled { removed_id: u32, spawned_id: u32 },
    GameOver { cause: GameOverCause },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal centre and feet (bottom edge)
    pub pos: Vec2,
    /// Feet height at the start of the current frame
    pub prev_y: f32,
    pub vel: Vec2,
    /// Rotation in degrees (presentation, but simulated)
    pub angle: f32,
    /// Sprite is mirrored while moving left
    pub facing_left: bool,
    pub score: u64,
    /// Difficulty scalar, always >= 1.0
    pub speed_multiplier: f32,
    /// Frames of powered flight remaining
    pub boost_timer: u32,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let pos = Vec2::new(tuning.width / 2.0, tuning.height - tuning.player_spawn_offset);
        Self {
            pos,
            prev_y: pos.y,
            vel: Vec2::ZERO,
            angle: 0.0,
            facing_left: false,
            score: 0,
            speed_multiplier: 1.0,
            boost_timer: 0,
            width: tuning.player_width,
            height: tuning.player_height,
        }
    }

    /// Hit box, anchored at the feet
    pub fn rect(&self) -> Rect {
        Rect::from_mid_bottom(self.pos, self.width, self.height)
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_timer > 0
    }
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Slides horizontally, bouncing off the screen edges
    Moving,
    /// Breaks on the first landing
    Breakable,
}

/// Optional attachment on a Normal platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Modifier {
    #[default]
    None,
    /// Launches with the spring impulse
    Spring,
    /// A booster pickup was spawned above this platform
    Booster,
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
    pub kind: PlatformKind,
    /// False once a breakable platform has been landed on
    pub active: bool,
    pub modifier: Modifier,
    /// Horizontal velocity before the difficulty multiplier (Moving only)
    pub vx: f32,
}

impl Platform {
    pub fn has_spring(&self) -> bool {
        self.modifier == Modifier::Spring
    }

    pub fn has_booster(&self) -> bool {
        self.modifier == Modifier::Booster
    }
}

/// A hovering enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    /// Sway phase offset (radians)
    pub phase: f32,
    pub size: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size, self.size)
    }
}

/// A projectile fired upward by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.width, self.height)
    }
}

/// A booster pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booster {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Booster {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.width, self.height)
    }
}

/// The whole session: phase, entity pools, scores and RNG
#[derive(Debug, Clone)]
pub struct GameState {
    /// Immutable balance for this session
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Index into the host's character roster
    pub selected_character: usize,
    /// Best score seen during this process
    pub high_score: u64,
    /// Frames simulated in the current run
    pub frame: u64,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub boosters: Vec<Booster>,
    /// Events raised during the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session on the menu screen with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// Create a session on the menu screen
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(&tuning);
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player,
            selected_character: 0,
            high_score: 0,
            frame: 0,
            platforms: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            boosters: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fold the current score into the high score
    pub fn record_high_score(&mut self) {
        self.high_score = self.high_score.max(self.player.score);
    }

    /// High score including the run in progress
    pub fn display_high_score(&self) -> u64 {
        self.high_score.max(self.player.score)
    }

    /// Clear all pools, reset the player and seed a fresh platform window
    pub fn reset_run(&mut self) {
        self.record_high_score();
        self.player = Player::new(&self.tuning);
        self.platforms.clear();
        self.enemies.clear();
        self.bullets.clear();
        self.boosters.clear();
        self.frame = 0;
        generator::seed_window(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_on_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.platforms.is_empty());
        assert_eq!(state.high_score, 0);
    }

    #[test]
    fn test_reset_run_keeps_high_score() {
        let mut state = GameState::new(1);
        state.player.score = 42;
        state.reset_run();
        assert_eq!(state.high_score, 42);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.platforms.len(), state.tuning.window_size + 1);
    }

    #[test]
    fn test_player_rect_is_anchored_at_feet() {
        let state = GameState::new(1);
        let rect = state.player.rect();
        assert_eq!(rect.bottom(), state.player.pos.y);
        assert_eq!(rect.center().x, state.player.pos.x);
    }
}
