use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CentralBodyConfig, DeltaVRejected, OrbitEvent, OrbitalElements, StateVectors2D};

/// How many orbit points are sampled when no count was ever requested.
const DEFAULT_ORBIT_POINTS: usize = 100;

/// The apoapsis must drop below this fraction of the maximum radius
/// before another max-radius warning can be raised.
const MAX_RADIUS_DEAD_ZONE: f64 = 0.99;

/// The periapsis must rise above this fraction of the minimum radius
/// before another min-radius warning can be raised.
const MIN_RADIUS_DEAD_ZONE: f64 = 1.01;

/// A body following a Keplerian orbit within operational radius limits.
///
/// The body keeps its position and velocity in planet-centered inertial
/// coordinates, along with the orbital elements fit to them. The state
/// is only moved forward by [`recalculate`][Self::recalculate], and the
/// orbit only changes through [`add_delta_v`][Self::add_delta_v] (checked
/// against the radius limits) or [`set_orbit`][Self::set_orbit].
///
/// # Example
/// ```
/// use glam::DVec2;
/// use orbital_barge::{CentralBodyConfig, OrbitalBody};
///
/// let config = CentralBodyConfig::default();
/// let mut body = OrbitalBody::new_circular(&config, 0.0, DVec2::new(5000.0, 0.0));
///
/// // A small prograde burn is fine...
/// assert!(body.add_delta_v(0.0, body.prograde() * 10.0).is_ok());
///
/// // ...but this would throw the body way past the maximum radius.
/// assert!(body.add_delta_v(0.0, body.prograde() * 500.0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalBody {
    minimum_orbital_radius: f64,
    maximum_orbital_radius: f64,

    position: DVec2,
    velocity: DVec2,

    elements: OrbitalElements,

    orbit_cache: Vec<DVec2>,
    orbit_cached: bool,

    at_min_radius: bool,
    at_max_radius: bool,

    events: Vec<OrbitEvent>,
}

impl OrbitalBody {
    /// Creates a body at the given state, with its orbit fit at the given time.
    ///
    /// The radius limits are not checked here; the first check happens on
    /// the first delta-v or explicit [`check_max_radius`][Self::check_max_radius]
    /// call.
    pub fn new(config: &CentralBodyConfig, time: f64, position: DVec2, velocity: DVec2) -> Self {
        let mut elements = OrbitalElements::default();
        elements.set_gravitational_parameter(config.mu);
        elements.set_orbit(time, position, velocity);

        Self {
            minimum_orbital_radius: config.minimum_orbital_radius,
            maximum_orbital_radius: config.maximum_orbital_radius,
            position,
            velocity,
            elements,
            orbit_cache: Vec::new(),
            orbit_cached: false,
            at_min_radius: false,
            at_max_radius: false,
            events: Vec::new(),
        }
    }

    /// Creates a body on a counter-clockwise circular orbit through the given position.
    pub fn new_circular(config: &CentralBodyConfig, time: f64, position: DVec2) -> Self {
        let mut body = Self::new(config, time, position, DVec2::ZERO);
        body.set_new_orbit(time, position);
        body
    }

    /// Moves the body to where its orbit puts it at the given time.
    ///
    /// If the elements are degenerate, the body's position and velocity
    /// become non-finite; drivers check for this before syncing anything.
    pub fn recalculate(&mut self, time: f64) {
        let StateVectors2D { position, velocity } = self.elements.to_cartesian(time);
        self.position = position;
        self.velocity = velocity;
    }

    /// Refits the orbit to a state, without checking the radius limits.
    pub fn set_orbit(&mut self, time: f64, position: DVec2, velocity: DVec2) {
        self.elements.set_orbit(time, position, velocity);
        self.orbit_cached = false;
    }

    /// Refits the orbit to the body's own state at the given time.
    pub fn refit(&mut self, time: f64) {
        self.set_orbit(time, self.position, self.velocity);
    }

    /// Puts the body on a circular orbit through the given position.
    pub fn set_new_orbit(&mut self, time: f64, position: DVec2) {
        self.elements.set_circular_orbit(time, position);
        self.orbit_cached = false;
        self.recalculate(time);
    }

    /// Applies an instantaneous change in velocity.
    ///
    /// The orbit is refit with the new velocity. If the new orbit crosses
    /// a radius limit, or has non-finite elements, the change is rejected
    /// and the elements are restored exactly as they were. Crossing a limit
    /// also raises its warning, once per breach. An escape trajectory
    /// counts as crossing the maximum radius.
    ///
    /// The position and velocity themselves only follow on the next
    /// [`recalculate`][Self::recalculate].
    pub fn add_delta_v(&mut self, time: f64, delta_v: DVec2) -> Result<(), DeltaVRejected> {
        let old_elements = self.elements;
        self.elements.set_orbit(time, self.position, self.velocity + delta_v);

        if !self.elements.is_finite() {
            self.elements = old_elements;
            tracing::warn!("Degenerate orbit from delta-v {delta_v} - delta-v change ignored.");
            return Err(DeltaVRejected::DegenerateOrbit);
        }

        if !self.check_max_radius() || !self.check_min_radius() {
            let rejected = DeltaVRejected::RadiusLimit {
                periapsis: self.elements.get_periapsis(),
                apoapsis: self.elements.get_apoapsis(),
            };
            self.elements = old_elements;
            tracing::warn!("Orbit radius limits exceeded - delta-v change ignored.");
            return Err(rejected);
        }

        self.orbit_cached = false;
        Ok(())
    }

    /// Returns `true` if the apoapsis is within the maximum orbital radius.
    ///
    /// On the first call that finds the apoapsis above the limit, a
    /// [`OrbitEvent::MaxRadiusBreached`] warning is raised. No further
    /// warning is raised until the apoapsis has dropped below 99% of the
    /// limit. Unbound orbits count as having an infinite apoapsis.
    pub fn check_max_radius(&mut self) -> bool {
        let apoapsis = if self.elements.get_eccentricity() >= 1.0 {
            f64::INFINITY
        } else {
            self.elements.get_apoapsis()
        };

        if apoapsis > self.maximum_orbital_radius {
            if !self.at_max_radius {
                tracing::warn!(
                    apoapsis,
                    limit = self.maximum_orbital_radius,
                    "Maximum orbital radius breached"
                );
                self.events.push(OrbitEvent::MaxRadiusBreached);
            }
            self.at_max_radius = true;
            return false;
        }

        if apoapsis < self.maximum_orbital_radius * MAX_RADIUS_DEAD_ZONE {
            self.at_max_radius = false;
        }
        true
    }

    /// Returns `true` if the periapsis is within the minimum orbital radius.
    ///
    /// On the first call that finds the periapsis below the limit, a
    /// [`OrbitEvent::MinRadiusBreached`] warning is raised. No further
    /// warning is raised until the periapsis has risen above 101% of the
    /// limit.
    pub fn check_min_radius(&mut self) -> bool {
        let periapsis = self.elements.get_periapsis();

        if periapsis < self.minimum_orbital_radius {
            if !self.at_min_radius {
                tracing::warn!(
                    periapsis,
                    limit = self.minimum_orbital_radius,
                    "Minimum orbital radius breached"
                );
                self.events.push(OrbitEvent::MinRadiusBreached);
            }
            self.at_min_radius = true;
            return false;
        }

        if periapsis > self.minimum_orbital_radius * MIN_RADIUS_DEAD_ZONE {
            self.at_min_radius = false;
        }
        true
    }

    /// Gets points along the current orbit, for drawing.
    ///
    /// The points are cached and only resampled when the orbit changed or
    /// a different number of points is asked for. Passing zero reuses the
    /// previous count, or 100 points if there's none yet.
    pub fn get_orbit_world_positions(&mut self, number_of_points: usize) -> &[DVec2] {
        let number_of_points = match number_of_points {
            0 if self.orbit_cache.len() > 1 => self.orbit_cache.len(),
            0 => DEFAULT_ORBIT_POINTS,
            n => n,
        };

        if self.orbit_cache.len() != number_of_points {
            self.orbit_cache.resize(number_of_points, DVec2::ZERO);
            self.orbit_cached = false;
        }

        if !self.orbit_cached {
            self.elements.get_orbit_coordinates(&mut self.orbit_cache);
            self.orbit_cached = true;
        }

        &self.orbit_cache
    }

    /// Returns `true` if the next orbit sample will be recomputed.
    pub fn is_orbit_cache_stale(&self) -> bool {
        !self.orbit_cached
    }

    /// Gets the position, in planet-centered inertial coordinates.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Gets the velocity, in planet-centered inertial coordinates.
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Gets the direction of motion.
    pub fn prograde(&self) -> DVec2 {
        self.velocity.normalize_or_zero()
    }

    /// Gets the direction against the motion.
    pub fn retrograde(&self) -> DVec2 {
        -self.prograde()
    }

    /// Gets the direction straight away from the central body.
    pub fn zenith(&self) -> DVec2 {
        self.position.normalize_or_zero()
    }

    /// Gets the direction straight toward the central body.
    pub fn nadir(&self) -> DVec2 {
        -self.zenith()
    }

    /// Gets the angle of the prograde direction from the +X axis, in
    /// degrees within `[0, 360)`.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use orbital_barge::{CentralBodyConfig, OrbitalBody};
    ///
    /// let config = CentralBodyConfig::default();
    /// let body = OrbitalBody::new(
    ///     &config,
    ///     0.0,
    ///     DVec2::new(5000.0, 0.0),
    ///     DVec2::new(0.0, -400.0),
    /// );
    ///
    /// assert!((body.prograde_rotation() - 270.0).abs() < 1e-9);
    /// ```
    pub fn prograde_rotation(&self) -> f64 {
        heading_degrees(self.prograde())
    }

    /// Gets the gravitational acceleration toward the central body.
    pub fn gravitational_force(&self) -> DVec2 {
        self.gravitational_force_at(self.position)
    }

    /// Gets the gravitational acceleration toward the central body at any
    /// position, regardless of the orbit.
    ///
    /// This is non-finite at the origin.
    pub fn gravitational_force_at(&self, position: DVec2) -> DVec2 {
        -self.elements.get_gravitational_parameter() / position.length_squared()
            * position.normalize_or_zero()
    }

    /// Gets the current orbital elements.
    pub fn orbital_elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Gets the minimum orbital radius.
    pub fn minimum_orbital_radius(&self) -> f64 {
        self.minimum_orbital_radius
    }

    /// Gets the maximum orbital radius.
    pub fn maximum_orbital_radius(&self) -> f64 {
        self.maximum_orbital_radius
    }

    /// Returns `true` while the min-radius warning is latched.
    pub fn is_at_min_radius(&self) -> bool {
        self.at_min_radius
    }

    /// Returns `true` while the max-radius warning is latched.
    pub fn is_at_max_radius(&self) -> bool {
        self.at_max_radius
    }

    /// Takes the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<OrbitEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: OrbitEvent) {
        self.events.push(event);
    }

    /// Gets a snapshot of the current orbit, for display.
    pub fn orbital_stats(&self) -> OrbitalStats {
        let elements = &self.elements;
        OrbitalStats {
            position: self.position,
            velocity: self.velocity,
            semi_major_axis: elements.get_semi_major_axis(),
            eccentricity: elements.get_eccentricity(),
            true_anomaly: elements.get_true_anomaly(),
            period: elements.get_orbital_period(),
            arg_pe: elements.get_arg_pe(),
            periapsis: elements.get_periapsis(),
            apoapsis: elements.get_apoapsis(),
        }
    }
}

/// A snapshot of an orbital body's state and orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalStats {
    /// The position of the body.
    pub position: DVec2,
    /// The velocity of the body.
    pub velocity: DVec2,
    /// The semi-major axis of the orbit.
    pub semi_major_axis: f64,
    /// The eccentricity of the orbit.
    pub eccentricity: f64,
    /// The true anomaly at the last evaluated time, in radians.
    pub true_anomaly: f64,
    /// The orbital period.
    pub period: f64,
    /// The argument of periapsis, in radians.
    pub arg_pe: f64,
    /// The periapsis of the orbit.
    pub periapsis: f64,
    /// The apoapsis of the orbit.
    pub apoapsis: f64,
}

/// Angle of a unit direction from the +X axis, in degrees within `[0, 360)`.
pub(crate) fn heading_degrees(direction: DVec2) -> f64 {
    let angle = direction.x.clamp(-1.0, 1.0).acos().to_degrees();
    if direction.y < 0.0 {
        360.0 - angle
    } else {
        angle
    }
}
