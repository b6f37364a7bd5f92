use core::f64::consts::TAU;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{solve_keplers_equation, StateVectors2D, CIRCULAR_EPSILON};

/// A set of planar Keplerian orbital elements.
///
/// This is the numerical engine of the crate. It fits elements to
/// Cartesian state vectors, propagates them in time, and samples the
/// shape of the orbit for drawing.
///
/// Only bound elliptic orbits (eccentricity below 1) are supported.
/// Inputs that produce other orbits don't panic: they produce
/// out-of-domain or non-finite elements, and propagating those yields
/// non-finite state vectors. See [`is_bound`][Self::is_bound] and
/// [`is_finite`][Self::is_finite].
///
/// The struct is [`Copy`], so taking a snapshot before a tentative
/// change and restoring it afterwards is a plain assignment.
///
/// # Example
/// ```
/// use glam::DVec2;
/// use orbital_barge::OrbitalElements;
///
/// let mu = 1.0e9;
/// let mut elements = OrbitalElements::new(0.0, 5000.0, 0.0, 0.0, mu);
///
/// // Speed things up a bit at periapsis
/// let speed = elements.get_circular_speed() * 1.1;
/// elements.set_orbit(0.0, DVec2::new(5000.0, 0.0), DVec2::new(0.0, speed));
///
/// assert!(elements.get_apoapsis() > 5000.0);
/// assert!((elements.get_periapsis() - 5000.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    /// The gravitational parameter of the central body (mu = GM).
    mu: f64,

    /// Half of the longest diameter of the ellipse.
    semi_major_axis: f64,

    /// 0 for circles, between 0 and 1 for ellipses.
    eccentricity: f64,

    /// The true anomaly at the last evaluated time, in radians.
    true_anomaly: f64,

    /// The angle from the +X axis to the periapsis, in radians.
    arg_pe: f64,

    /// The orbital period.
    period: f64,

    periapsis: f64,
    apoapsis: f64,

    /// The mean anomaly at `epoch`, in radians.
    mean_anomaly: f64,

    /// The time at which the element set was last fit.
    epoch: f64,

    /// +1 for counter-clockwise motion, -1 for clockwise motion.
    direction: f64,
}

impl OrbitalElements {
    /// Creates a new counter-clockwise orbit with its epoch at time zero.
    ///
    /// # Parameters
    /// - `eccentricity`: The eccentricity of the orbit.
    /// - `periapsis`: The periapsis of the orbit.
    /// - `arg_pe`: The angle from the +X axis to the periapsis, in radians.
    /// - `mean_anomaly`: The mean anomaly at epoch, in radians.
    /// - `mu`: The gravitational parameter of the central body.
    ///
    /// # Example
    /// ```
    /// use orbital_barge::OrbitalElements;
    ///
    /// let orbit = OrbitalElements::new(0.2, 2.8, 0.7, 2.9, 9.2);
    ///
    /// assert_eq!(orbit.get_eccentricity(), 0.2);
    /// assert!((orbit.get_periapsis() - 2.8).abs() < 1e-12);
    /// assert_eq!(orbit.get_arg_pe(), 0.7);
    /// assert_eq!(orbit.get_mean_anomaly_at_epoch(), 2.9);
    /// assert_eq!(orbit.get_gravitational_parameter(), 9.2);
    /// ```
    pub fn new(eccentricity: f64, periapsis: f64, arg_pe: f64, mean_anomaly: f64, mu: f64) -> Self {
        let semi_major_axis = periapsis / (1.0 - eccentricity);
        let mut elements = Self {
            mu,
            semi_major_axis,
            eccentricity,
            true_anomaly: 0.0,
            arg_pe,
            period: 0.0,
            periapsis,
            apoapsis: 0.0,
            mean_anomaly,
            epoch: 0.0,
            direction: 1.0,
        };
        elements.update_derived();
        elements.true_anomaly = elements
            .get_true_anomaly_at_eccentric_anomaly(
                elements.get_eccentric_anomaly_at_mean_anomaly(mean_anomaly),
            )
            .rem_euclid(TAU);
        elements
    }

    /// Creates a new counter-clockwise orbit from its apsides.
    ///
    /// The apoapsis must not be less than the periapsis.
    ///
    /// # Example
    /// ```
    /// use orbital_barge::OrbitalElements;
    ///
    /// let orbit = OrbitalElements::with_apoapsis(7000.0, 3000.0, 0.0, 0.0, 1.0e9);
    ///
    /// assert!((orbit.get_semi_major_axis() - 5000.0).abs() < 1e-9);
    /// assert!((orbit.get_eccentricity() - 0.4).abs() < 1e-12);
    /// ```
    pub fn with_apoapsis(
        apoapsis: f64,
        periapsis: f64,
        arg_pe: f64,
        mean_anomaly: f64,
        mu: f64,
    ) -> Self {
        let eccentricity = (apoapsis - periapsis) / (apoapsis + periapsis);
        Self::new(eccentricity, periapsis, arg_pe, mean_anomaly, mu)
    }

    /// Fits the elements to a Cartesian state at a given time.
    ///
    /// The given time becomes the new epoch.
    ///
    /// # Degenerate input
    /// A position at the origin or a velocity that leaves no angular
    /// momentum can't describe an elliptic orbit. This function doesn't
    /// panic for those; it produces out-of-domain or non-finite elements,
    /// which propagate into non-finite state vectors.
    ///
    /// # Zero radial velocity
    /// At exactly zero radial velocity (an apsis), the body is treated
    /// as outbound and the true anomaly stays in `[0, pi]`.
    pub fn set_orbit(&mut self, time: f64, position: DVec2, velocity: DVec2) {
        let mu = self.mu;
        let altitude = position.length();
        let speed_squared = velocity.length_squared();
        let radial_dot = position.dot(velocity);

        // Specific angular momentum, as the z component of r x v
        let angular_momentum = position.perp_dot(velocity);
        let direction = if angular_momentum < 0.0 { -1.0 } else { 1.0 };

        let eccentricity_vector =
            ((speed_squared - mu / altitude) * position - radial_dot * velocity) / mu;
        let eccentricity = eccentricity_vector.length();

        // Vis-viva
        let semi_major_axis = 1.0 / (2.0 / altitude - speed_squared / mu);

        let (arg_pe, true_anomaly) = if eccentricity < CIRCULAR_EPSILON {
            // No usable periapsis direction; measure from the body itself
            (position.y.atan2(position.x), 0.0)
        } else {
            let arg_pe = eccentricity_vector.y.atan2(eccentricity_vector.x);
            let cos_true_anomaly =
                (eccentricity_vector.dot(position) / (eccentricity * altitude)).clamp(-1.0, 1.0);
            let angle = cos_true_anomaly.acos();
            let true_anomaly = if radial_dot >= 0.0 { angle } else { TAU - angle };
            (arg_pe, true_anomaly)
        };

        self.semi_major_axis = semi_major_axis;
        self.eccentricity = eccentricity;
        self.arg_pe = arg_pe;
        self.true_anomaly = true_anomaly;
        self.direction = direction;
        self.epoch = time;
        self.mean_anomaly = self.get_mean_anomaly_at_true_anomaly(true_anomaly);
        self.update_derived();
    }

    /// Fits a circular orbit through the given position.
    ///
    /// The orbit runs counter-clockwise, with its periapsis reference
    /// at the position itself. The speed on this orbit is
    /// [`get_circular_speed`][Self::get_circular_speed]; which way is
    /// "forward" for the caller's entity is decided a layer above.
    pub fn set_circular_orbit(&mut self, time: f64, position: DVec2) {
        self.semi_major_axis = position.length();
        self.eccentricity = 0.0;
        self.arg_pe = position.y.atan2(position.x);
        self.true_anomaly = 0.0;
        self.mean_anomaly = 0.0;
        self.direction = 1.0;
        self.epoch = time;
        self.update_derived();
    }

    /// Propagates the elements to the given time and returns the state vectors there.
    ///
    /// The true anomaly at that time is recorded.
    ///
    /// # Non-finite results
    /// If the elements are degenerate (see [`set_orbit`][Self::set_orbit]),
    /// the returned vectors contain non-finite components. Check them with
    /// [`StateVectors2D::is_finite`] before using them.
    ///
    /// # Example
    /// ```
    /// use orbital_barge::OrbitalElements;
    ///
    /// let mut orbit = OrbitalElements::new(0.3, 4000.0, 1.1, 0.4, 1.0e9);
    /// let period = orbit.get_orbital_period();
    ///
    /// let first = orbit.to_cartesian(0.0);
    /// let second = orbit.to_cartesian(period);
    ///
    /// assert!((first.position - second.position).length() < 1e-6);
    /// ```
    pub fn to_cartesian(&mut self, time: f64) -> StateVectors2D {
        let mean_anomaly = self.get_mean_anomaly_at_time(time);
        let eccentric_anomaly = self.get_eccentric_anomaly_at_mean_anomaly(mean_anomaly);
        let true_anomaly = self.get_true_anomaly_at_eccentric_anomaly(eccentric_anomaly);

        self.true_anomaly = true_anomaly.rem_euclid(TAU);

        let altitude = self.semi_major_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos());
        self.get_state_vectors_at_true_anomaly_unchecked(altitude, true_anomaly)
    }

    /// Fills the buffer with points along the orbit.
    ///
    /// The points are evenly spaced in true anomaly, starting at the
    /// periapsis and following the direction of motion. This depends
    /// only on the shape of the orbit, not on the epoch or the last
    /// evaluated time.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use orbital_barge::OrbitalElements;
    ///
    /// let orbit = OrbitalElements::new(0.0, 100.0, 0.0, 0.0, 1.0);
    /// let mut buffer = [DVec2::ZERO; 4];
    /// orbit.get_orbit_coordinates(&mut buffer);
    ///
    /// assert!((buffer[0] - DVec2::new(100.0, 0.0)).length() < 1e-9);
    /// assert!((buffer[1] - DVec2::new(0.0, 100.0)).length() < 1e-9);
    /// ```
    pub fn get_orbit_coordinates(&self, buffer: &mut [DVec2]) {
        let count = buffer.len() as f64;
        for (i, point) in buffer.iter_mut().enumerate() {
            let true_anomaly = TAU * i as f64 / count;
            *point = self.get_position_at_true_anomaly(true_anomaly);
        }
    }

    /// Gets the eccentric anomaly at a given mean anomaly.
    ///
    /// See [`solve_keplers_equation`][crate::solve_keplers_equation].
    pub fn get_eccentric_anomaly_at_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        solve_keplers_equation(mean_anomaly, self.eccentricity)
    }

    /// Gets the true anomaly at a given eccentric anomaly, in `(-pi, pi]`.
    pub fn get_true_anomaly_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        // tan(v/2) = sqrt((1 + e) / (1 - e)) * tan(E/2)
        let e = self.eccentricity;
        let (s, c) = (eccentric_anomaly * 0.5).sin_cos();
        2.0 * ((1.0 + e).sqrt() * s).atan2((1.0 - e).sqrt() * c)
    }

    /// Gets the eccentric anomaly at a given true anomaly, in `(-pi, pi]`.
    pub fn get_eccentric_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let (s, c) = true_anomaly.sin_cos();
        ((1.0 - e * e).sqrt() * s).atan2(e + c)
    }

    /// Gets the mean anomaly at a given true anomaly.
    pub fn get_mean_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        let eccentric_anomaly = self.get_eccentric_anomaly_at_true_anomaly(true_anomaly);
        eccentric_anomaly - self.eccentricity * eccentric_anomaly.sin()
    }

    /// Gets the mean anomaly at a given time.
    ///
    /// This is `M0 + n (t - t0)`, where `n` is the mean motion.
    pub fn get_mean_anomaly_at_time(&self, time: f64) -> f64 {
        self.mean_anomaly + self.get_mean_motion() * (time - self.epoch)
    }

    /// Gets the mean motion, `2 pi / T`, in radians per unit of time.
    pub fn get_mean_motion(&self) -> f64 {
        (self.mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Gets the distance from the central body at a given true anomaly.
    pub fn get_altitude_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        self.get_semi_latus_rectum() / (1.0 + self.eccentricity * true_anomaly.cos())
    }

    /// Gets the position at a given true anomaly.
    pub fn get_position_at_true_anomaly(&self, true_anomaly: f64) -> DVec2 {
        let altitude = self.get_altitude_at_true_anomaly(true_anomaly);
        let (s, c) = true_anomaly.sin_cos();
        self.transform_pqw_vector(DVec2::new(altitude * c, self.direction * altitude * s))
    }

    fn get_state_vectors_at_true_anomaly_unchecked(
        &self,
        altitude: f64,
        true_anomaly: f64,
    ) -> StateVectors2D {
        let (s, c) = true_anomaly.sin_cos();
        let speed_mult = (self.mu / self.get_semi_latus_rectum()).sqrt();

        let pqw_position = DVec2::new(altitude * c, self.direction * altitude * s);
        let pqw_velocity = DVec2::new(
            -speed_mult * s,
            self.direction * speed_mult * (self.eccentricity + c),
        );

        StateVectors2D {
            position: self.transform_pqw_vector(pqw_position),
            velocity: self.transform_pqw_vector(pqw_velocity),
        }
    }

    /// Rotates a vector from the perifocal frame into the inertial frame.
    pub fn transform_pqw_vector(&self, vector: DVec2) -> DVec2 {
        DVec2::from_angle(self.arg_pe).rotate(vector)
    }

    fn update_derived(&mut self) {
        self.periapsis = self.semi_major_axis * (1.0 - self.eccentricity);
        self.apoapsis = self.semi_major_axis * (1.0 + self.eccentricity);
        // T = 2pi * sqrt(a^3 / GM)
        self.period = TAU * (self.semi_major_axis.powi(3) / self.mu).sqrt();
    }

    /// Returns `true` if the elements describing the conic and the body's
    /// place on it are all finite.
    ///
    /// The period and the mean anomaly are left out, as they are `NaN` for
    /// any hyperbolic trajectory even when the trajectory itself is well
    /// defined.
    pub fn is_finite(&self) -> bool {
        [
            self.mu,
            self.semi_major_axis,
            self.eccentricity,
            self.true_anomaly,
            self.arg_pe,
            self.periapsis,
            self.apoapsis,
        ]
        .iter()
        .all(|value| value.is_finite())
    }

    /// Returns `true` if the orbit is a closed ellipse, which is the only
    /// kind of orbit this crate propagates.
    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0 && self.semi_major_axis > 0.0
    }

    /// Gets the gravitational parameter of the central body.
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Sets the gravitational parameter, keeping the other elements as-is.
    ///
    /// Only meant for configuring a fresh element set: the period changes,
    /// so a body on this orbit will jump if propagated afterwards.
    pub fn set_gravitational_parameter(&mut self, mu: f64) {
        self.mu = mu;
        self.update_derived();
    }

    /// Gets the semi-major axis.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Gets the eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Gets the true anomaly at the last evaluated time, in `[0, tau)`.
    pub fn get_true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// Gets the argument of periapsis, in `(-pi, pi]`.
    pub fn get_arg_pe(&self) -> f64 {
        self.arg_pe
    }

    /// Gets the orbital period.
    ///
    /// This is `NaN` for hyperbolic trajectories.
    pub fn get_orbital_period(&self) -> f64 {
        self.period
    }

    /// Gets the periapsis (closest distance to the central body).
    pub fn get_periapsis(&self) -> f64 {
        self.periapsis
    }

    /// Gets the apoapsis (farthest distance from the central body).
    ///
    /// This is negative for hyperbolic trajectories.
    pub fn get_apoapsis(&self) -> f64 {
        self.apoapsis
    }

    /// Gets the mean anomaly at epoch.
    pub fn get_mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly
    }

    /// Gets the time at which the elements were last fit.
    pub fn get_epoch(&self) -> f64 {
        self.epoch
    }

    /// Gets the direction of motion: +1 for counter-clockwise, -1 for clockwise.
    pub fn get_direction(&self) -> f64 {
        self.direction
    }

    /// Gets the semi-latus rectum, `a (1 - e^2)`.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Gets the specific orbital energy, `-mu / 2a`.
    pub fn get_specific_energy(&self) -> f64 {
        -self.mu / (2.0 * self.semi_major_axis)
    }

    /// Gets the speed of a circular orbit with this semi-major axis.
    pub fn get_circular_speed(&self) -> f64 {
        (self.mu / self.semi_major_axis).sqrt()
    }
}

impl Default for OrbitalElements {
    /// Creates a unit circular orbit around a unit mass.
    fn default() -> Self {
        Self::new(0.0, 1.0, 0.0, 0.0, 1.0)
    }
}
