//! Voltage-vs-time plot geometry
//!
//! Produces a step plot in a unit rectangle: x is time from the first
//! sample, y is voltage with 0 at the bottom of the range. The voltage is
//! held until the next sample, then jumps.

use glam::Vec2;

use crate::hud::TIME_DISPLAY_SCALE;
use crate::sim::TimeSample;

/// Default voltage axis (kV)
pub const DEFAULT_RANGE: (f32, f32) = (-2.0, 2.0);
pub const VOLTAGE_TICKS: usize = 5;
pub const TIME_TICKS: usize = 6;
/// Smallest time span the x axis is stretched over
const MIN_SPAN: f64 = 1e-6;

/// A line segment in unit coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

/// An axis tick: position along the axis in [0, 1] plus its label value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub at: f32,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct VoltagePlot {
    pub segments: Vec<Segment>,
    /// Seconds from first to last sample
    pub span: f64,
    pub range: (f32, f32),
}

impl VoltagePlot {
    /// Build the plot; needs at least two samples
    pub fn new(samples: &[TimeSample], range: (f32, f32)) -> Option<Self> {
        let first = samples.first()?;
        if samples.len() < 2 {
            return None;
        }

        let t0 = first.time;
        let span = samples
            .iter()
            .map(|s| s.time - t0)
            .fold(0.0, f64::max);
        let span = if span <= 0.0 { MIN_SPAN } else { span };

        let (v_min, v_max) = range;
        let point = |s: &TimeSample| {
            Vec2::new(
                ((s.time - t0) / span) as f32,
                (s.voltage - v_min) / (v_max - v_min),
            )
        };

        let mut segments = Vec::with_capacity((samples.len() - 1) * 2);
        for pair in samples.windows(2) {
            let a = point(&pair[0]);
            let b = point(&pair[1]);
            let corner = Vec2::new(b.x, a.y);
            segments.push(Segment { from: a, to: corner });
            segments.push(Segment {
                from: corner,
                to: b,
            });
        }

        Some(Self {
            segments,
            span,
            range,
        })
    }

    /// Evenly spaced voltage ticks from the bottom of the range
    pub fn voltage_ticks(&self) -> Vec<Tick> {
        let (v_min, v_max) = self.range;
        (0..VOLTAGE_TICKS)
            .map(|i| {
                let at = i as f32 / (VOLTAGE_TICKS - 1) as f32;
                Tick {
                    at,
                    value: f64::from(v_min + at * (v_max - v_min)),
                }
            })
            .collect()
    }

    /// Evenly spaced time ticks, labelled in displayed milliseconds
    pub fn time_ticks(&self) -> Vec<Tick> {
        (0..TIME_TICKS)
            .map(|i| {
                let at = i as f32 / (TIME_TICKS - 1) as f32;
                Tick {
                    at,
                    value: f64::from(at) * self.span * TIME_DISPLAY_SCALE,
                }
            })
            .collect()
    }
}
