//! # Planar Keplerian Orbits for Game Entities
//! This library crate drives game entities ("orbital bodies") along two-body
//! Keplerian orbits around a central mass, in a planar projection of an
//! inertial frame.
//!
//! Keplerian orbits don't need time steps to stay stable: a set of orbital
//! elements describes the body's *full trajectory*, and the position at any
//! time is computed analytically. Games still need collisions and thrust,
//! though, so this crate also handles impulsive velocity changes (delta-v),
//! operational radius limits, and the reconciliation with an external
//! rigid-body physics engine.
//!
//! ## Getting started
//! The crate is built in three layers:
//! - [`OrbitalElements`]: The numerical engine. Converts between state vectors
//!   and Keplerian elements, propagates in time, and samples the orbit shape.
//! - [`OrbitalBody`]: A stateful wrapper holding the current position and
//!   velocity, the radius limits, and a cache of sampled orbit points.
//! - [`OrbitalRigidbody`]: A per-tick driver that either slaves a
//!   [`RigidBody2D`] to the analytic orbit or applies gravity as a force,
//!   and turns collision impulses into delta-v.
//!
//! A [`Simulation`] ties these together into an explicit fixed-step loop.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec2;
//!
//! use orbital_barge::OrbitalElements;
//!
//! # fn main() {
//! let mut elements = OrbitalElements::default();
//! elements.set_circular_orbit(0.0, DVec2::new(5000.0, 0.0));
//!
//! assert_eq!(elements.get_eccentricity(), 0.0);
//! assert_eq!(elements.get_periapsis(), 5000.0);
//! assert_eq!(elements.get_apoapsis(), 5000.0);
//!
//! let sv = elements.to_cartesian(0.0);
//! assert!((sv.position - DVec2::new(5000.0, 0.0)).length() < 1e-9);
//! # }
//! ```

#![warn(missing_docs)]

mod body;
pub mod config;
mod elements;
pub mod error;
pub mod events;
pub mod physics;
mod rigidbody;
mod simulation;

use core::f64::consts::{PI, TAU};

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::{OrbitalBody, OrbitalStats};
pub use config::{CentralBodyConfig, RigidbodyConfig, SimulationConfig};
pub use elements::OrbitalElements;
pub use error::{ConfigError, DeltaVRejected, SimulationError};
pub use events::OrbitEvent;
pub use physics::{ActorTag, Collision, Contact, ForceMode, PointMassBody, RigidBody2D};
pub use rigidbody::{OrbitalRigidbody, UpdateMethod};
pub use simulation::{Entity, EntityId, Simulation};

/// The maximum number of iterations for the Kepler's equation solver.
///
/// This is used to guarantee termination within a simulation step,
/// even when the input is not finite.
pub const NUMERIC_MAX_ITERS: u32 = 64;

/// The step size below which the Kepler's equation solver is considered
/// to have converged, in radians.
pub const KEPLER_TOLERANCE: f64 = 1e-12;

/// Below this eccentricity, the eccentricity vector is too short to define
/// a periapsis direction, and the position direction is used instead.
pub const CIRCULAR_EPSILON: f64 = 1e-9;

/// A struct representing a position and velocity at a point in the orbit.
///
/// The position and velocity vectors are two-dimensional, expressed in
/// planet-centered inertial coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors2D {
    /// The 2D position at a point in the orbit.
    pub position: DVec2,
    /// The 2D velocity at a point in the orbit.
    pub velocity: DVec2,
}

impl StateVectors2D {
    /// Returns `true` if every component of both vectors is finite.
    ///
    /// Propagating a degenerate orbit yields non-finite state vectors
    /// instead of an error, so callers check this before committing
    /// the state anywhere visible.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Solves Kepler's equation `M = E - e sin E` for the eccentric anomaly `E`.
///
/// Uses Newton-Raphson seeded with `E0 = M`, after folding the mean anomaly
/// into `[0, pi]` using the periodicity and odd symmetry of the equation.
/// The root for a folded mean anomaly always lies in `[0, pi]`, so every
/// iterate is clamped into that interval; together with the convexity of the
/// equation there, this makes the iteration converge for any eccentricity
/// below 1.
///
/// The returned eccentric anomaly lies in `[-pi, pi]`.
///
/// # Non-finite results
/// Returns `NaN` if the mean anomaly is not finite, or if the solver did not
/// converge within [`NUMERIC_MAX_ITERS`] iterations.
///
/// # Example
/// ```
/// use orbital_barge::solve_keplers_equation;
///
/// let e = 0.5;
/// let mean_anomaly = 1.2;
/// let ecc_anom = solve_keplers_equation(mean_anomaly, e);
///
/// let residual = ecc_anom - e * ecc_anom.sin() - mean_anomaly;
/// assert!(residual.abs() < 1e-10);
///
/// assert!(solve_keplers_equation(f64::NAN, e).is_nan());
/// ```
pub fn solve_keplers_equation(mean_anomaly: f64, eccentricity: f64) -> f64 {
    if !mean_anomaly.is_finite() || !eccentricity.is_finite() {
        return f64::NAN;
    }

    let mut mean_anomaly = mean_anomaly % TAU;
    if mean_anomaly > PI {
        mean_anomaly -= TAU;
    } else if mean_anomaly < -PI {
        mean_anomaly += TAU;
    }
    let sign = if mean_anomaly < 0.0 { -1.0 } else { 1.0 };
    let mean_anomaly = mean_anomaly.abs();

    let mut eccentric_anomaly = mean_anomaly;

    for _ in 0..NUMERIC_MAX_ITERS {
        let f = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        let fp = keplers_equation_derivative(eccentric_anomaly, eccentricity);
        let delta = f / fp;

        let next = (eccentric_anomaly - delta).clamp(0.0, PI);
        let step = next - eccentric_anomaly;
        eccentric_anomaly = next;

        if step.abs() < KEPLER_TOLERANCE {
            return eccentric_anomaly * sign;
        }
        if !step.is_finite() {
            break;
        }
    }

    f64::NAN
}

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}
#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}

#[cfg(test)]
mod tests;
