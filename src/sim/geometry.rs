//! Scene geometry resolved to pixels
//!
//! The bench is laid out along a horizontal flight axis:
//! gun -> plates -> target sheet. All x coordinates grow toward the target.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{PhysicalConstants, SceneLayout};
use crate::consts::MM_PER_M;

/// Fixed bench geometry in scene units (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Gun position (left edge of gun body)
    pub gun_x: f32,
    /// Where every shot starts
    pub launch: Vec2,
    /// Horizontal extent of the plates (start, end)
    pub plate_start_x: f32,
    pub plate_end_x: f32,
    /// Vertical distance between plates
    pub plate_gap: f32,
    /// Target sheet plane
    pub target_x: f32,
    /// Visible vertical span (top, bottom)
    pub top: f32,
    pub bottom: f32,
    /// Muzzle speed along the flight axis (pixels/s)
    pub muzzle_speed: f32,
    /// Pixels per second that correspond to one metre per second
    pub speed_scale: f32,
}

impl Geometry {
    pub fn new(constants: &PhysicalConstants, layout: &SceneLayout) -> Self {
        let ppm = layout.pixels_per_mm;
        let plate_start_x = layout.plate_start_x;
        let plate_end_x = plate_start_x + constants.plate_length_mm * ppm;
        let gun_x = plate_start_x - constants.gun_to_plate_mm * ppm;
        let axis_y = layout.view_height * layout.axis_fraction;
        let speed_scale = MM_PER_M * ppm * layout.visual_scale;

        Self {
            gun_x,
            launch: Vec2::new(gun_x + layout.muzzle_offset, axis_y),
            plate_start_x,
            plate_end_x,
            plate_gap: constants.plate_gap_mm * ppm,
            target_x: plate_end_x + constants.plate_to_target_mm * ppm,
            top: 0.0,
            bottom: layout.view_height,
            muzzle_speed: constants.droplet_speed * speed_scale,
            speed_scale,
        }
    }

    /// Whether y is inside the visible span
    #[inline]
    pub fn in_view(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }

    /// Inner faces of the upper and lower plate
    pub fn plate_faces(&self) -> (f32, f32) {
        let half = self.plate_gap / 2.0;
        (self.launch.y - half, self.launch.y + half)
    }
}
