//! Data-driven game balance
//!
//! Every physics and generation constant lives in [`Tuning`]. A session holds
//! one immutable copy for its whole lifetime. Values can be overridden from
//! JSON; missing fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the player's horizontal velocity follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Accelerate toward the target outside a dead-zone, with friction and a speed cap
    #[default]
    Track,
    /// Velocity proportional to the distance to the target
    Proportional,
}

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },
}

/// Game balance and world geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub width: f32,
    pub height: f32,

    // === Player body ===
    pub player_width: f32,
    pub player_height: f32,
    /// Spawn height of the player's feet, measured up from the bottom edge
    pub player_spawn_offset: f32,

    // === Gravity phase ===
    pub gravity: f32,
    pub control: ControlMode,
    /// Horizontal acceleration per frame while tracking
    pub run_accel: f32,
    /// Velocity retained each frame (1.0 = no friction)
    pub friction: f32,
    pub max_run_speed: f32,
    pub dead_zone: f32,
    pub proportional_gain: f32,
    /// Degrees of tilt per unit of horizontal velocity
    pub tilt_factor: f32,
    pub tilt_ease: f32,

    // === Landing ===
    pub jump_impulse: f32,
    pub spring_impulse: f32,
    /// Jump impulse scales by `multiplier ^ jump_damping`
    pub jump_damping: f32,
    /// How far the feet may sit from a platform top and still land
    pub landing_tolerance: f32,

    // === Boost ===
    pub boost_thrust_velocity: f32,
    pub boost_thrust_frames: u32,
    pub boost_decay_frames: u32,
    pub boost_decay_gravity: f32,
    /// Degrees per frame while under full thrust
    pub boost_spin: f32,
    /// Degrees per frame eased back during decay
    pub boost_unspin: f32,

    // === Camera ===
    pub camera_damping: f32,

    // === Platforms ===
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_gap: f32,
    /// Platforms seeded above the safe platform
    pub window_size: usize,
    /// Distance from the bottom edge to the first seeded platform
    pub first_row_offset: f32,
    /// Distance from the bottom edge to the full-width safe platform
    pub safe_platform_offset: f32,
    pub moving_speed: f32,
    pub moving_chance: f64,
    pub breakable_chance: f64,
    pub spring_chance: f64,
    pub booster_chance: f64,
    /// Springs only fit on platforms narrower than this
    pub spring_max_platform_width: f32,

    // === Booster pickup ===
    pub booster_width: f32,
    pub booster_height: f32,
    pub booster_lift: f32,

    // === Enemies ===
    pub enemy_chance: f64,
    pub enemy_size: f32,
    pub enemy_spawn_y: f32,
    pub enemy_spawn_margin: f32,
    pub enemy_sway: f32,
    /// Radians of sway phase advanced per frame
    pub enemy_sway_rate: f32,

    // === Bullets ===
    pub bullet_velocity: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    // === Difficulty ===
    pub difficulty_start: u64,
    pub difficulty_step: u64,
    pub difficulty_increment: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,

            player_width: 50.0,
            player_height: 80.0,
            player_spawn_offset: 100.0,

            gravity: 0.6,
            control: ControlMode::Track,
            run_accel: 0.9,
            friction: 0.88,
            max_run_speed: 9.0,
            dead_zone: 6.0,
            proportional_gain: 0.12,
            tilt_factor: 3.0,
            tilt_ease: 0.1,

            jump_impulse: -16.0,
            spring_impulse: -32.0,
            jump_damping: 0.3,
            landing_tolerance: 20.0,

            boost_thrust_velocity: -28.0,
            boost_thrust_frames: 85,
            boost_decay_frames: 45,
            boost_decay_gravity: 0.55,
            boost_spin: 15.0,
            boost_unspin: 10.0,

            camera_damping: 0.15,

            platform_width: 75.0,
            platform_height: 18.0,
            platform_gap: 90.0,
            window_size: 10,
            first_row_offset: 110.0,
            safe_platform_offset: 20.0,
            moving_speed: 2.0,
            moving_chance: 0.15,
            breakable_chance: 0.10,
            spring_chance: 0.12,
            booster_chance: 0.06,
            spring_max_platform_width: 100.0,

            booster_width: 30.0,
            booster_height: 45.0,
            booster_lift: 25.0,

            enemy_chance: 0.05,
            enemy_size: 50.0,
            enemy_spawn_y: -100.0,
            enemy_spawn_margin: 50.0,
            enemy_sway: 3.0,
            // 0.005 rad/ms
            enemy_sway_rate: 0.005 * 1000.0 / crate::consts::SIM_FPS as f32,

            bullet_velocity: -22.0,
            bullet_width: 4.0,
            bullet_height: 25.0,

            difficulty_start: 50,
            difficulty_step: 70,
            difficulty_increment: 0.25,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Chance of drawing a Normal platform
    pub fn normal_chance(&self) -> f64 {
        1.0 - self.moving_chance - self.breakable_chance
    }

    /// Total boost length in frames
    pub fn boost_total_frames(&self) -> u32 {
        self.boost_thrust_frames.saturating_add(self.boost_decay_frames)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn out_of_range(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::OutOfRange {
                field,
                reason: reason.into(),
            }
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(out_of_range("width/height", "world size must be positive"));
        }
        if self.platform_width <= 0.0 || self.platform_width > self.width {
            return Err(out_of_range(
                "platform_width",
                format!("must be in (0, {}]", self.width),
            ));
        }
        if self.platform_gap <= 0.0 {
            return Err(out_of_range("platform_gap", "must be positive"));
        }
        if self.window_size == 0 {
            return Err(out_of_range("window_size", "need at least one platform"));
        }
        if !(self.camera_damping > 0.0 && self.camera_damping <= 1.0) {
            return Err(out_of_range("camera_damping", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(out_of_range("friction", "must be in [0, 1]"));
        }
        if !(0.0..1.0).contains(&self.jump_damping) {
            return Err(out_of_range("jump_damping", "must be in [0, 1)"));
        }
        if self.jump_impulse >= 0.0 || self.spring_impulse >= 0.0 {
            return Err(out_of_range(
                "jump_impulse/spring_impulse",
                "impulses point upward and must be negative",
            ));
        }
        for (field, p) in [
            ("moving_chance", self.moving_chance),
            ("breakable_chance", self.breakable_chance),
            ("spring_chance", self.spring_chance),
            ("booster_chance", self.booster_chance),
            ("enemy_chance", self.enemy_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(out_of_range(field, format!("{p} is not a probability")));
            }
        }
        if self.spring_chance + self.booster_chance > 1.0 {
            return Err(out_of_range(
                "spring_chance",
                "spring and booster chances must not exceed 1 together",
            ));
        }
        if self.normal_chance() <= 0.7 {
            return Err(out_of_range(
                "moving_chance",
                format!("normal platforms must exceed 70%, got {:.2}", self.normal_chance()),
            ));
        }
        if self.breakable_chance >= 0.15 || self.breakable_chance > self.moving_chance {
            return Err(out_of_range(
                "breakable_chance",
                "breakable must be the rarest kind and below 15%",
            ));
        }
        if self.boost_thrust_frames.checked_add(self.boost_decay_frames).is_none() {
            return Err(out_of_range(
                "boost_thrust_frames",
                "thrust and decay frames together overflow a frame counter",
            ));
        }
        if self.difficulty_step == 0 {
            return Err(out_of_range("difficulty_step", "must be non-zero"));
        }
        if self.difficulty_increment < 0.0 {
            return Err(out_of_range("difficulty_increment", "must not be negative"));
        }
        Ok(())
    }
}
