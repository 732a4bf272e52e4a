//! Simulation configuration
//!
//! Physical constants, scene layout and sweep parameters. Every field has a
//! default matching the reference bench setup, so a config file only needs
//! to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};
use crate::error::{SimError, SimResult};
use crate::sim::{Geometry, SweepSchedule};

/// Physical properties of the droplet and the plate assembly.
///
/// Lengths are in millimetres, speed in metres per second, SI otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Droplet charge (C)
    pub charge: f32,
    /// Droplet mass (kg)
    pub mass: f32,
    /// Distance between the plates
    pub plate_gap_mm: f32,
    /// Length of the plates along the flight axis
    pub plate_length_mm: f32,
    /// Gun to plate entry
    pub gun_to_plate_mm: f32,
    /// Plate exit to target sheet
    pub plate_to_target_mm: f32,
    /// Muzzle speed (m/s)
    pub droplet_speed: f32,
    pub droplet_diameter_mm: f32,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            charge: -1.9e-10,
            mass: 1e-9,
            plate_gap_mm: 1.0,
            plate_length_mm: 0.5,
            gun_to_plate_mm: 1.25,
            plate_to_target_mm: 1.25,
            droplet_speed: 20.0,
            droplet_diameter_mm: 0.084,
        }
    }
}

impl PhysicalConstants {
    /// Charge-to-mass ratio (C/kg)
    #[inline]
    pub fn charge_to_mass(&self) -> f32 {
        self.charge / self.mass
    }
}

/// How the bench maps onto the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub pixels_per_mm: f32,
    /// Slows motion down so the droplet is visible at all
    pub visual_scale: f32,
    pub view_width: f32,
    pub view_height: f32,
    /// Left edge of the plates (pixels)
    pub plate_start_x: f32,
    /// Flight axis as a fraction of view height
    pub axis_fraction: f32,
    /// Gun body plus nozzle radius, from gun position to launch point
    pub muzzle_offset: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            pixels_per_mm: 150.0,
            visual_scale: 1e-4,
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            plate_start_x: VIEW_WIDTH / 2.0 - 50.0,
            axis_fraction: 0.65,
            muzzle_offset: 60.0 + 8.0,
        }
    }
}

/// Voltage sweep parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// First voltage of the stepped range (kV)
    pub start: f32,
    /// Last voltage of the stepped range (kV)
    pub end: f32,
    /// Step size, always positive; direction follows start/end
    pub step: f32,
    /// Explicit schedule, overrides the stepped range when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltages: Option<Vec<f32>>,
    /// Dwell after a flight ends before the next step fires (seconds)
    pub settle_delay: f32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 2.0,
            end: -2.0,
            step: 0.25,
            voltages: None,
            settle_delay: 0.15,
        }
    }
}

impl SweepConfig {
    /// Build the schedule this config describes
    pub fn schedule(&self) -> SimResult<SweepSchedule> {
        match &self.voltages {
            Some(voltages) => SweepSchedule::new(voltages.clone()),
            None => SweepSchedule::stepped(self.start, self.end, self.step),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub constants: PhysicalConstants,
    pub layout: SceneLayout,
    pub sweep: SweepConfig,
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check the values the physics depends on
    pub fn validate(&self) -> SimResult<()> {
        let c = &self.constants;
        let l = &self.layout;

        let positive = [
            ("mass", c.mass),
            ("plate_gap_mm", c.plate_gap_mm),
            ("plate_length_mm", c.plate_length_mm),
            ("droplet_speed", c.droplet_speed),
            ("pixels_per_mm", l.pixels_per_mm),
            ("visual_scale", l.visual_scale),
            ("view_width", l.view_width),
            ("view_height", l.view_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("gun_to_plate_mm", c.gun_to_plate_mm),
            ("plate_to_target_mm", c.plate_to_target_mm),
            ("settle_delay", self.sweep.settle_delay),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if !c.charge.is_finite() {
            return Err(SimError::InvalidConfig("charge must be finite".into()));
        }
        if !(0.0..=1.0).contains(&l.axis_fraction) {
            return Err(SimError::InvalidConfig(format!(
                "axis_fraction must be within 0..=1, got {}",
                l.axis_fraction
            )));
        }

        self.sweep.schedule()?;

        let geometry = Geometry::new(c, l);
        if geometry.target_x <= geometry.launch.x || geometry.target_x > l.view_width {
            return Err(SimError::InvalidConfig(format!(
                "target plane x={} must lie between launch x={} and view width {}",
                geometry.target_x, geometry.launch.x, l.view_width
            )));
        }

        Ok(())
    }
}
