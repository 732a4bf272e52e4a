//! Voltage-over-time samples for the sweep plot
//!
//! Samples are kept in call order. Timestamps are expected to be
//! non-decreasing but the recorder neither checks nor reorders them.

use serde::{Deserialize, Serialize};

/// One (timestamp, voltage) sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    /// Session clock (seconds)
    pub time: f64,
    pub voltage: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeriesRecorder {
    samples: Vec<TimeSample>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, time: f64, voltage: f32) {
        self.samples.push(TimeSample { time, voltage });
    }

    pub fn all(&self) -> &[TimeSample] {
        &self.samples
    }

    /// Samples recorded at or after position `mark`
    pub fn since(&self, mark: usize) -> &[TimeSample] {
        &self.samples[mark.min(self.samples.len())..]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_call_order() {
        let mut series = TimeSeriesRecorder::new();
        series.sample(1.0, 2.0);
        series.sample(0.5, 1.5); // out of order, kept as given
        series.sample(2.0, 1.0);

        let times: Vec<f64> = series.all().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 0.5, 2.0]);
    }

    #[test]
    fn test_since_mark() {
        let mut series = TimeSeriesRecorder::new();
        series.sample(0.0, 2.0);
        series.sample(1.0, 1.0);
        series.sample(2.0, 0.0);

        assert_eq!(series.since(1).len(), 2);
        assert_eq!(series.since(1)[0].voltage, 1.0);
        assert!(series.since(10).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut series = TimeSeriesRecorder::new();
        series.sample(0.0, 2.0);
        series.clear();
        assert!(series.is_empty());
    }
}
