//! Electrostatic field between the plates
//!
//! The field is uniform and purely transverse, and exists only while the
//! droplet is horizontally between the plates.

use glam::Vec2;

use super::geometry::Geometry;
use crate::config::PhysicalConstants;
use crate::consts::MM_PER_M;

/// Maps plate voltage and droplet position to acceleration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    charge: f32,
    mass: f32,
    /// Plate separation in metres
    gap_m: f32,
    plate_start_x: f32,
    plate_end_x: f32,
}

impl FieldModel {
    pub fn new(constants: &PhysicalConstants, geometry: &Geometry) -> Self {
        Self {
            charge: constants.charge,
            mass: constants.mass,
            gap_m: constants.plate_gap_mm / MM_PER_M,
            plate_start_x: geometry.plate_start_x,
            plate_end_x: geometry.plate_end_x,
        }
    }

    /// Field strength E = V / d
    #[inline]
    pub fn field_strength(&self, voltage: f32) -> f32 {
        voltage / self.gap_m
    }

    /// Whether the field acts at horizontal position x
    #[inline]
    pub fn in_span(&self, x: f32) -> bool {
        x > self.plate_start_x && x < self.plate_end_x
    }

    /// Acceleration on the droplet at `pos` for the given plate voltage.
    ///
    /// Zero outside the plate span; otherwise `(0, qE/m)`.
    pub fn acceleration(&self, voltage: f32, pos: Vec2) -> Vec2 {
        if !self.in_span(pos.x) {
            return Vec2::ZERO;
        }
        let ay = self.charge * self.field_strength(voltage) / self.mass;
        Vec2::new(0.0, ay)
    }
}
