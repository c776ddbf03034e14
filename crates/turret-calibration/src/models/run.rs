//! Run result returned to callers.

use serde::{Deserialize, Serialize};

/// Outcome of a calibration run. Not stored beyond the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    /// Total angular travel of the run
    pub distance_in_degrees: u64,

    /// Runs completed for the turret, including this one
    pub number_of_tests: u64,
}
