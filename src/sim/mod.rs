//! Per-frame simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per host frame
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod generator;
pub mod kinematics;
pub mod rect;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use rect::Rect;
pub use state::{
    Booster, Bullet, Enemy, GameEvent, GameOverCause, GamePhase, GameState, Modifier, Platform,
    PlatformKind, Player,
};
pub use tick::{Snapshot, TickInput, tick};
