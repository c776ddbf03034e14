//! Turret identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location tag of a physical turret mount.
///
/// Serialized by variant name, so `"Stern"` on the wire maps to [`TurretLocation::Stern`].
/// Unknown names are rejected during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurretLocation {
    Bow,
    Stern,
    Port,
    Starboard,
}

impl TurretLocation {
    /// Every turret mount on the ship.
    pub const ALL: [TurretLocation; 4] = [
        TurretLocation::Bow,
        TurretLocation::Stern,
        TurretLocation::Port,
        TurretLocation::Starboard,
    ];

    /// Variant name, as used in storage keys and JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TurretLocation::Bow => "Bow",
            TurretLocation::Stern => "Stern",
            TurretLocation::Port => "Port",
            TurretLocation::Starboard => "Starboard",
        }
    }
}

impl fmt::Display for TurretLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
