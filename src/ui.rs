//! Screen regions shared by the simulation and the presentation layer
//!
//! Hit regions are derived from the configured world size so the host can
//! draw buttons exactly where presses are tested.

use glam::Vec2;

use crate::consts::CHARACTER_COUNT;
use crate::sim::rect::Rect;
use crate::tuning::Tuning;

/// Named screen regions for a given world size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            width: tuning.width,
            height: tuning.height,
        }
    }

    /// Round fire button above the bottom centre (Playing)
    pub fn fire_button(&self) -> Rect {
        Rect::new(self.width / 2.0 - 35.0, self.height - 90.0, 70.0, 70.0)
    }

    /// Portrait slot for character `index` on the menu row
    pub fn character_slot(&self, index: usize) -> Rect {
        let column = self.width / CHARACTER_COUNT as f32;
        // 300 px on the 640 px reference screen
        let row_y = self.height * 0.46875;
        let center = Vec2::new(column * index as f32 + column / 2.0, row_y);
        Rect::from_center(center, 70.0, 90.0)
    }

    /// Character slot under a press, if any
    pub fn character_at(&self, point: Vec2) -> Option<usize> {
        (0..CHARACTER_COUNT).find(|&i| self.character_slot(i).contains_point(point))
    }

    /// "Retry" button (GameOver)
    pub fn retry_button(&self) -> Rect {
        Rect::new(self.width / 2.0 - 85.0, self.height / 2.0 + 20.0, 170.0, 45.0)
    }

    /// "Menu" button (GameOver)
    pub fn menu_button(&self) -> Rect {
        Rect::new(self.width / 2.0 - 85.0, self.height / 2.0 + 80.0, 170.0, 45.0)
    }
}
