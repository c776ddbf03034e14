//! Durable per-turret counter storage.
//!
//! [`CalibrationStore`] is the seam the service talks to. [`RocksDbStore`] keeps counters
//! across restarts; [`MemoryStore`] keeps them for the life of the process.

use crate::error::{Error, Result};
use crate::models::{CalibrationCounter, TurretLocation};
use rocksdb::{Options, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

/// Key prefix for counter records.
const COUNTER_PREFIX: &str = "counter:";

/// Storage for per-turret calibration counters.
pub trait CalibrationStore: Send + Sync {
    /// Counter for a turret, if one has been created.
    fn find_by_turret(&self, turret: TurretLocation) -> Result<Option<CalibrationCounter>>;

    /// Insert or replace the counter for its turret.
    fn save(&self, counter: &CalibrationCounter) -> Result<CalibrationCounter>;

    /// All stored counters, ordered by turret.
    fn list(&self) -> Result<Vec<CalibrationCounter>>;

    /// Count one completed run: increment the turret's counter, or create it at 1.
    ///
    /// The default issues a lookup and a save. Implementations shared between threads
    /// override it to serialize the pair per store.
    fn record_run(&self, turret: TurretLocation) -> Result<CalibrationCounter> {
        let next = next_counter(turret, self.find_by_turret(turret)?);
        self.save(&next)
    }
}

fn next_counter(
    turret: TurretLocation,
    existing: Option<CalibrationCounter>,
) -> CalibrationCounter {
    match existing {
        Some(counter) => {
            tracing::debug!(
                "Found counter for turret {} at {}",
                turret,
                counter.number_of_tests
            );
            counter.increment()
        }
        None => {
            tracing::debug!("No counter for turret {}, creating one", turret);
            CalibrationCounter::first_run(turret)
        }
    }
}

fn counter_key(turret: TurretLocation) -> String {
    format!("{}{}", COUNTER_PREFIX, turret)
}

/// RocksDB-backed counter store.
pub struct RocksDbStore {
    db: DB,
    /// Serializes `record_run` so concurrent runs never lose an increment.
    write_lock: Mutex<()>,
}

impl RocksDbStore {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }
}

impl CalibrationStore for RocksDbStore {
    fn find_by_turret(&self, turret: TurretLocation) -> Result<Option<CalibrationCounter>> {
        match self.db.get(counter_key(turret).as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn save(&self, counter: &CalibrationCounter) -> Result<CalibrationCounter> {
        let value = serde_json::to_vec(counter)?;
        self.db
            .put(counter_key(counter.turret_location).as_bytes(), value)?;
        Ok(*counter)
    }

    fn list(&self) -> Result<Vec<CalibrationCounter>> {
        let prefix = COUNTER_PREFIX.as_bytes();
        let mut counters = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix) {
                let counter: CalibrationCounter = serde_json::from_slice(&value)?;
                counters.push(counter);
            } else {
                break;
            }
        }

        counters.sort_by_key(|c| c.turret_location);
        Ok(counters)
    }

    fn record_run(&self, turret: TurretLocation) -> Result<CalibrationCounter> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("counter write lock poisoned".into()))?;
        let next = next_counter(turret, self.find_by_turret(turret)?);
        self.save(&next)
    }
}

/// In-memory counter store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: RwLock<HashMap<TurretLocation, CalibrationCounter>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given counters.
    pub fn with_counters(counters: impl IntoIterator<Item = CalibrationCounter>) -> Self {
        let counters = counters
            .into_iter()
            .map(|c| (c.turret_location, c))
            .collect();
        Self {
            counters: RwLock::new(counters),
        }
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("memory store lock poisoned".into())
}

impl CalibrationStore for MemoryStore {
    fn find_by_turret(&self, turret: TurretLocation) -> Result<Option<CalibrationCounter>> {
        let counters = self.counters.read().map_err(poisoned)?;
        Ok(counters.get(&turret).copied())
    }

    fn save(&self, counter: &CalibrationCounter) -> Result<CalibrationCounter> {
        let mut counters = self.counters.write().map_err(poisoned)?;
        counters.insert(counter.turret_location, *counter);
        Ok(*counter)
    }

    fn list(&self) -> Result<Vec<CalibrationCounter>> {
        let counters = self.counters.read().map_err(poisoned)?;
        let mut all: Vec<_> = counters.values().copied().collect();
        all.sort_by_key(|c| c.turret_location);
        Ok(all)
    }

    fn record_run(&self, turret: TurretLocation) -> Result<CalibrationCounter> {
        let mut counters = self.counters.write().map_err(poisoned)?;
        let next = next_counter(turret, counters.get(&turret).copied());
        counters.insert(turret, next);
        Ok(next)
    }
}
