//! Persisted per-turret test counter.

use super::TurretLocation;
use serde::{Deserialize, Serialize};

/// Number of calibration runs completed for one turret.
///
/// One record exists per [`TurretLocation`], created on the first run for that turret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationCounter {
    /// Turret this counter belongs to (primary key)
    pub turret_location: TurretLocation,

    /// Completed runs, never decreases
    pub number_of_tests: u64,
}

impl CalibrationCounter {
    /// Counter for a turret's first completed run.
    pub fn first_run(turret_location: TurretLocation) -> Self {
        Self {
            turret_location,
            number_of_tests: 1,
        }
    }

    /// Count one more completed run.
    pub fn increment(mut self) -> Self {
        self.number_of_tests += 1;
        self
    }
}
