//! Static configuration.
//!
//! These values are set once per body or per simulation and never
//! computed at runtime.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, UpdateMethod};

/// The default gravitational parameter of the central body.
pub const DEFAULT_MU: f64 = 1.0e9;

/// The default minimum orbital radius.
pub const DEFAULT_MINIMUM_ORBITAL_RADIUS: f64 = 2000.0;

/// The default maximum orbital radius.
pub const DEFAULT_MAXIMUM_ORBITAL_RADIUS: f64 = 7000.0;

/// The default fixed time step, in seconds.
pub const DEFAULT_TIME_STEP: f64 = 0.02;

/// The central body and the operational limits around it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CentralBodyConfig {
    /// The gravitational parameter (mu = GM) of the central body.
    pub mu: f64,

    /// Orbits with a periapsis below this are rejected.
    pub minimum_orbital_radius: f64,

    /// Orbits with an apoapsis above this are rejected.
    pub maximum_orbital_radius: f64,
}

impl CentralBodyConfig {
    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mu.is_finite() && self.mu > 0.0) {
            return Err(ConfigError::InvalidGravitationalParameter(self.mu));
        }

        let (min, max) = (self.minimum_orbital_radius, self.maximum_orbital_radius);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::InvalidRadiusLimits { min, max });
        }

        Ok(())
    }
}

impl Default for CentralBodyConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            minimum_orbital_radius: DEFAULT_MINIMUM_ORBITAL_RADIUS,
            maximum_orbital_radius: DEFAULT_MAXIMUM_ORBITAL_RADIUS,
        }
    }
}

/// Settings for an [`OrbitalRigidbody`][crate::OrbitalRigidbody].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RigidbodyConfig {
    /// How the rigid body is kept on its orbit.
    pub method: UpdateMethod,

    /// How much harder the player pushes than anything else.
    ///
    /// In [`UpdateMethod::Forces`] mode, the physics engine already
    /// transfers the raw impulse, so only `player_multiplier - 1` is added.
    pub player_multiplier: f64,

    /// How many contacts of a single collision are considered.
    pub max_contacts: usize,
}

impl RigidbodyConfig {
    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.player_multiplier.is_finite() {
            return Err(ConfigError::InvalidPlayerMultiplier(self.player_multiplier));
        }
        if self.max_contacts == 0 {
            return Err(ConfigError::NoContacts);
        }
        Ok(())
    }
}

impl Default for RigidbodyConfig {
    fn default() -> Self {
        Self {
            method: UpdateMethod::FollowOrbit,
            player_multiplier: 2.0,
            max_contacts: 5,
        }
    }
}

/// Shared context for a [`Simulation`][crate::Simulation].
///
/// # Example
/// ```
/// use orbital_barge::{ConfigError, SimulationConfig};
///
/// let mut config = SimulationConfig::default();
/// assert!(config.validate().is_ok());
///
/// config.central_body.minimum_orbital_radius = 8000.0;
/// assert_eq!(
///     config.validate(),
///     Err(ConfigError::InvalidRadiusLimits { min: 8000.0, max: 7000.0 })
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// The fixed time step between ticks, in seconds.
    pub time_step: f64,

    /// The central body every entity orbits.
    pub central_body: CentralBodyConfig,

    /// The default driver settings for new entities.
    pub rigidbody: RigidbodyConfig,
}

impl SimulationConfig {
    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        self.central_body.validate()?;
        self.rigidbody.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            central_body: CentralBodyConfig::default(),
            rigidbody: RigidbodyConfig::default(),
        }
    }
}
