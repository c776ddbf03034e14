//! Calibration service: stages settings and runs them.
//!
//! `configure` stages one turret setting, replacing whatever was staged before for any
//! turret. `run` consumes the staged setting, counts the run against the turret's persisted
//! counter, and clears the slot once the counter is stored.
//!
//! A failed run leaves the staged setting in place, so the caller can retry `run` without
//! configuring again. There is no rollback: a counter that was saved stays saved.
//!
//! Concurrent runs are serialized on the slot's run lock, so a staged setting is consumed at
//! most once. `configure` does not take that lock: a `configure` landing between a run's read
//! and its clear is cleared along with the consumed setting and never runs.

use crate::error::{Error, Result};
use crate::models::{CalibrationCounter, RunResponse, SettingsRequest, TurretSettings};
use crate::pending::{PendingConfiguration, PendingSetting};
use crate::storage::CalibrationStore;
use std::sync::Arc;

/// Total angular travel of a run: `rotations * (end - start)`.
///
/// Always positive, since validated settings have `end > start` and `rotations >= 1`.
pub fn calibration_distance(settings: &TurretSettings) -> u64 {
    let sweep = settings.rotation_end_point() - settings.rotation_start_point();
    u64::from(settings.rotations()) * u64::from(sweep)
}

/// Stages turret settings and runs them against a counter store.
pub struct CalibrationService {
    pending: Arc<PendingConfiguration>,
    store: Arc<dyn CalibrationStore>,
}

impl CalibrationService {
    /// Service with its own empty pending slot.
    pub fn new(store: Arc<dyn CalibrationStore>) -> Self {
        Self::with_pending(store, Arc::new(PendingConfiguration::new()))
    }

    /// Service sharing an existing pending slot.
    pub fn with_pending(
        store: Arc<dyn CalibrationStore>,
        pending: Arc<PendingConfiguration>,
    ) -> Self {
        Self { pending, store }
    }

    /// Stage settings for the next run, replacing any staged setting.
    pub async fn configure(&self, settings: TurretSettings) -> PendingSetting {
        tracing::info!("Staging turret setting: {:?}", settings);
        let distance = calibration_distance(&settings);
        let staged = self.pending.set(settings.location(), distance).await;
        tracing::info!(
            "Staged turret {} with total distance {} degrees",
            staged.turret,
            staged.total_distance_degrees
        );
        staged
    }

    /// Validate a raw request and stage it.
    ///
    /// A rejected request fails with [`Error::Validation`] and leaves the staged setting alone.
    pub async fn configure_request(&self, request: &SettingsRequest) -> Result<PendingSetting> {
        let settings = request.validate()?;
        Ok(self.configure(settings).await)
    }

    /// Run the staged setting and count it against the turret.
    pub async fn run(&self) -> Result<RunResponse> {
        let _run = self.pending.lock_run().await;

        let staged = self
            .pending
            .get()
            .await
            .filter(|s| s.total_distance_degrees > 0)
            .ok_or(Error::NotConfigured)?;
        tracing::info!("Running turret setting on turret {}", staged.turret);

        let counter = self.store.record_run(staged.turret).map_err(|e| {
            tracing::error!("Failed to record run for turret {}: {}", staged.turret, e);
            e
        })?;

        let response = RunResponse {
            distance_in_degrees: staged.total_distance_degrees,
            number_of_tests: counter.number_of_tests,
        };
        tracing::info!("Run response for turret {} is {:?}", staged.turret, response);

        self.pending.clear().await;
        tracing::info!("Turret settings have been reset");

        Ok(response)
    }

    /// Currently staged setting, if any.
    pub async fn pending(&self) -> Option<PendingSetting> {
        self.pending.get().await
    }

    /// All persisted counters.
    pub fn counters(&self) -> Result<Vec<CalibrationCounter>> {
        self.store.list()
    }
}
