//! Append-only record of droplet landings

use serde::{Deserialize, Serialize};

/// Where a droplet hit the target sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub x: f32,
    pub y: f32,
}

/// Landings in arrival order (oldest first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactLedger {
    records: Vec<ImpactRecord>,
}

impl ImpactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, x: f32, y: f32) {
        self.records.push(ImpactRecord { x, y });
    }

    /// All impacts, oldest first
    pub fn all(&self) -> &[ImpactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&ImpactRecord> {
        self.records.last()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
