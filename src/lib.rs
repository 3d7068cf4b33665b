//! Sky Hop - An endless vertical platformer
//!
//! Core modules:
//! - `sim`: Per-frame simulation (kinematics, camera, level generation, collisions, session)
//! - `tuning`: Data-driven game balance
//! - `ui`: Named screen regions for the presentation layer

pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{ControlMode, Tuning, TuningError};
pub use ui::Layout;

/// Fixed simulation constants
pub mod consts {
    /// Reference host frame rate (one simulation step per frame)
    pub const SIM_FPS: u32 = 60;

    /// Number of selectable characters on the menu screen
    pub const CHARACTER_COUNT: usize = 4;
}

/// Wrap a horizontal coordinate into [0, width)
#[inline]
pub fn wrap_x(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to exactly `width` for tiny negative inputs
    if wrapped >= width { 0.0 } else { wrapped }
}

/// Shortest signed horizontal distance from `from` to `to` on a wrapping world
#[inline]
pub fn shortest_dx(from: f32, to: f32, width: f32) -> f32 {
    let mut dx = to - from;
    if dx > width / 2.0 {
        dx -= width;
    } else if dx < -width / 2.0 {
        dx += width;
    }
    dx
}
