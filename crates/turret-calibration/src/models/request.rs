//! Settings requests and their validation.

use super::TurretLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Smallest accepted caliber (mm).
pub const MIN_CALIBER: i64 = 102;
/// Largest accepted caliber (mm).
pub const MAX_CALIBER: i64 = 450;
/// Lowest rotation point (degrees).
pub const MIN_ROTATION_POINT: i64 = 0;
/// Highest rotation point (degrees).
pub const MAX_ROTATION_POINT: i64 = 180;
/// Fewest rotations a run may perform.
pub const MIN_ROTATIONS: i32 = 1;

/// Turret settings as submitted by a client, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRequest {
    /// Barrel caliber; checked but not used by the distance computation
    pub caliber: i64,
    pub location: TurretLocation,
    pub rotation_start_point: i64,
    pub rotation_end_point: i64,
    pub rotations: i32,
}

impl SettingsRequest {
    /// Check every field and the start/end ordering.
    ///
    /// All violations are collected, keyed by field name. The ordering check is reported
    /// under `settingsRequest` since it spans two fields.
    pub fn validate(&self) -> Result<TurretSettings, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.caliber < MIN_CALIBER {
            errors.insert("caliber", format!("Minimum value of caliber is {}", MIN_CALIBER));
        } else if self.caliber > MAX_CALIBER {
            errors.insert("caliber", format!("Maximum value of caliber is {}", MAX_CALIBER));
        }

        check_rotation_point(
            &mut errors,
            "rotationStartPoint",
            "rotation_start_point",
            self.rotation_start_point,
        );
        check_rotation_point(
            &mut errors,
            "rotationEndPoint",
            "rotation_end_point",
            self.rotation_end_point,
        );

        if self.rotations < MIN_ROTATIONS {
            errors.insert(
                "rotations",
                format!("Minimum value of rotations is {}", MIN_ROTATIONS),
            );
        }

        if self.rotation_end_point <= self.rotation_start_point {
            errors.insert(
                "settingsRequest",
                "rotation_end_point must be greater than rotation_start_point",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Bounds are checked above, so the narrowing casts cannot wrap.
        Ok(TurretSettings {
            location: self.location,
            rotation_start_point: self.rotation_start_point as u32,
            rotation_end_point: self.rotation_end_point as u32,
            rotations: self.rotations as u32,
        })
    }
}

fn check_rotation_point(errors: &mut ValidationErrors, field: &str, wire_name: &str, value: i64) {
    if value < MIN_ROTATION_POINT {
        errors.insert(
            field,
            format!("Minimum value of {} is {}", wire_name, MIN_ROTATION_POINT),
        );
    } else if value > MAX_ROTATION_POINT {
        errors.insert(
            field,
            format!("Maximum value of {} is {}", wire_name, MAX_ROTATION_POINT),
        );
    }
}

/// Settings that passed [`SettingsRequest::validate`].
///
/// Only obtainable through validation, so `rotation_end_point > rotation_start_point`,
/// `rotations >= 1` and both points within `0..=180` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurretSettings {
    location: TurretLocation,
    rotation_start_point: u32,
    rotation_end_point: u32,
    rotations: u32,
}

impl TurretSettings {
    pub fn location(&self) -> TurretLocation {
        self.location
    }

    pub fn rotation_start_point(&self) -> u32 {
        self.rotation_start_point
    }

    pub fn rotation_end_point(&self) -> u32 {
        self.rotation_end_point
    }

    pub fn rotations(&self) -> u32 {
        self.rotations
    }
}

/// Validation messages keyed by the offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// Record a message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// Message recorded for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with a message.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
