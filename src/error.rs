//! Error types.
//!
//! Nothing in the per-tick path returns an error for numeric trouble:
//! degenerate orbits propagate as non-finite values and are skipped by
//! the driver. Errors are reserved for rejected requests and bad
//! configuration.

use thiserror::Error;

use crate::simulation::EntityId;

/// Why a configuration was rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The gravitational parameter must be positive and finite.
    #[error("gravitational parameter must be positive and finite, got {0}")]
    InvalidGravitationalParameter(f64),

    /// The radius limits must satisfy `0 < min < max`.
    #[error("orbital radius limits must satisfy 0 < min < max, got min = {min}, max = {max}")]
    InvalidRadiusLimits {
        /// The configured minimum orbital radius.
        min: f64,
        /// The configured maximum orbital radius.
        max: f64,
    },

    /// The time step must be positive and finite.
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    /// The player multiplier must be finite.
    #[error("player multiplier must be finite, got {0}")]
    InvalidPlayerMultiplier(f64),

    /// The mass of a rigid body must be positive and finite.
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    /// At least one contact must be considered per collision.
    #[error("max contacts must be at least 1")]
    NoContacts,
}

/// Why a delta-v was not applied.
///
/// The orbital elements are left exactly as they were before the call.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum DeltaVRejected {
    /// The new orbit would cross an orbital radius limit.
    #[error("orbit radius limits exceeded (periapsis {periapsis}, apoapsis {apoapsis})")]
    RadiusLimit {
        /// The periapsis the rejected orbit would have had.
        periapsis: f64,
        /// The apoapsis the rejected orbit would have had.
        apoapsis: f64,
    },

    /// The new state doesn't describe a finite, closed orbit.
    #[error("delta-v would leave the body on a degenerate or unbound orbit")]
    DegenerateOrbit,
}

/// Errors from the [`Simulation`][crate::Simulation].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    /// There is no entity with this ID.
    #[error("no entity with id {0}")]
    EntityNotFound(EntityId),

    /// The simulation configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
