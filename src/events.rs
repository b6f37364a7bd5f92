//! Discrete events raised by orbital bodies and their drivers.
//!
//! The core only detects these conditions. What to show the player, or
//! whether to end the mission, is up to whoever drains the events.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A notification raised by an orbital body or its driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitEvent {
    /// The periapsis dropped below the minimum orbital radius.
    ///
    /// Raised once per breach; it won't be raised again until the
    /// periapsis recovers past the dead zone above the limit.
    MinRadiusBreached,

    /// The apoapsis rose above the maximum orbital radius.
    ///
    /// Raised once per breach; it won't be raised again until the
    /// apoapsis recovers past the dead zone below the limit.
    MaxRadiusBreached,

    /// The body touched the surface of the central body.
    MissionFailed,
}

impl OrbitEvent {
    /// Returns `true` for the radius-limit warnings.
    pub fn is_radius_warning(&self) -> bool {
        matches!(self, Self::MinRadiusBreached | Self::MaxRadiusBreached)
    }
}
