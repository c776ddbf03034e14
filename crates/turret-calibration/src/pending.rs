//! Single-slot holder for the staged turret setting.
//!
//! Exactly one setting can be staged at a time, for any turret. Staging a new one replaces
//! the previous pair wholesale; turret and distance always change together under one lock.
//!
//! Runs consume the slot under a separate run lock, so one staged setting is run at most
//! once. Staging does not take the run lock.

use crate::models::TurretLocation;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// The staged turret and the total angular distance its run will travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSetting {
    pub turret: TurretLocation,

    /// Zero means nothing to run
    pub total_distance_degrees: u64,
}

/// Shared slot for the currently staged setting. Empty until the first `set`.
#[derive(Debug, Default)]
pub struct PendingConfiguration {
    slot: RwLock<Option<PendingSetting>>,
    /// Held by a run from reading the slot until clearing it.
    run_lock: Mutex<()>,
}

impl PendingConfiguration {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a setting, replacing whatever was staged before.
    pub async fn set(&self, turret: TurretLocation, total_distance_degrees: u64) -> PendingSetting {
        let setting = PendingSetting {
            turret,
            total_distance_degrees,
        };
        *self.slot.write().await = Some(setting);
        setting
    }

    /// Snapshot of the staged setting, if any.
    pub async fn get(&self) -> Option<PendingSetting> {
        *self.slot.read().await
    }

    /// Drop the staged setting.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Exclusive right to consume the slot. Waits for any run already in progress.
    pub async fn lock_run(&self) -> MutexGuard<'_, ()> {
        self.run_lock.lock().await
    }
}
