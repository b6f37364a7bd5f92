use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    body::heading_degrees, ActorTag, Collision, ForceMode, OrbitEvent, OrbitalBody, RigidBody2D,
    RigidbodyConfig,
};

/// How an [`OrbitalRigidbody`] keeps its rigid body on the orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateMethod {
    /// Gravity is applied to a dynamic rigid body as a force, and the orbit
    /// is refit from wherever the physics engine puts the body.
    Forces,

    /// The rigid body is kinematic and slaved to the analytic orbit.
    /// Collisions change the orbit through delta-v.
    #[default]
    FollowOrbit,
}

/// Reconciles an [`OrbitalBody`] with a rigid body in a physics engine.
///
/// The driver owns neither side. Both are borrowed for the duration of
/// each call, so the same driver settings can be shared between entities.
///
/// # Example
/// ```
/// use glam::DVec2;
/// use orbital_barge::{
///     CentralBodyConfig, OrbitalBody, OrbitalRigidbody, PointMassBody,
///     RigidBody2D, RigidbodyConfig,
/// };
///
/// let driver = OrbitalRigidbody::new(&RigidbodyConfig::default());
/// let mut body = OrbitalBody::new_circular(
///     &CentralBodyConfig::default(),
///     0.0,
///     DVec2::new(5000.0, 0.0),
/// );
/// let mut rb = PointMassBody::default();
///
/// driver.awake(&mut rb);
/// driver.start(0.0, &mut body, &mut rb);
/// assert!(rb.is_kinematic());
///
/// driver.fixed_update(1.0, &mut body, &mut rb);
/// rb.integrate(0.02);
/// assert!((rb.position().length() - 5000.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalRigidbody {
    method: UpdateMethod,
    player_multiplier: f64,
    max_contacts: usize,
}

impl OrbitalRigidbody {
    /// Creates a driver from its configuration.
    pub fn new(config: &RigidbodyConfig) -> Self {
        Self {
            method: config.method,
            player_multiplier: config.player_multiplier,
            max_contacts: config.max_contacts,
        }
    }

    /// Gets the update method.
    pub fn method(&self) -> UpdateMethod {
        self.method
    }

    /// Gets the multiplier applied to contacts with the player.
    pub fn player_multiplier(&self) -> f64 {
        self.player_multiplier
    }

    /// Gets how many contacts of a collision are considered.
    pub fn max_contacts(&self) -> usize {
        self.max_contacts
    }

    /// Prepares a rigid body to be driven.
    ///
    /// Only [`UpdateMethod::Forces`] leaves the body dynamic.
    pub fn awake(&self, rb: &mut impl RigidBody2D) {
        rb.set_kinematic(self.method != UpdateMethod::Forces);
    }

    /// Moves the rigid body onto the orbit for the first time.
    ///
    /// This syncs the rigid body to the orbit in both modes, so a
    /// [`UpdateMethod::Forces`] body starts out with its orbital velocity.
    pub fn start(&self, time: f64, body: &mut OrbitalBody, rb: &mut impl RigidBody2D) {
        body.recalculate(time);
        Self::follow_orbit(body, rb);
    }

    /// Runs one physics step.
    pub fn fixed_update(&self, time: f64, body: &mut OrbitalBody, rb: &mut impl RigidBody2D) {
        match self.method {
            UpdateMethod::FollowOrbit => {
                body.recalculate(time);
                Self::follow_orbit(body, rb);
            }
            UpdateMethod::Forces => Self::use_forces(time, body, rb),
        }
    }

    fn follow_orbit(body: &OrbitalBody, rb: &mut impl RigidBody2D) {
        if !(body.position().is_finite() && body.velocity().is_finite()) {
            tracing::debug!(
                position = %body.position(),
                velocity = %body.velocity(),
                "Non-finite orbital state, skipping sync"
            );
            return;
        }

        rb.set_velocity(body.velocity());
        rb.move_position(body.position());
        rb.set_rotation(body.prograde_rotation());
        tracing::trace!(position = %body.position(), "Synced rigid body to orbit");
    }

    fn use_forces(time: f64, body: &mut OrbitalBody, rb: &mut impl RigidBody2D) {
        body.set_orbit(time, rb.position(), rb.velocity());
        body.recalculate(time);

        // The rigid body is the ground truth here. Its fitted orbit may be
        // unbound, or degenerate when it is at rest.
        let gravity = body.gravitational_force_at(rb.position()) * rb.mass();
        if !gravity.is_finite() {
            tracing::debug!(
                %gravity,
                position = %rb.position(),
                "Non-finite gravity, skipping force"
            );
            return;
        }

        rb.add_force(gravity, ForceMode::Force);

        let heading = rb.velocity().normalize_or_zero();
        if heading != DVec2::ZERO {
            rb.set_rotation(heading_degrees(heading));
        }
        tracing::trace!(%gravity, "Applied gravity to rigid body");
    }

    /// Gets the change in motion caused by a collision.
    ///
    /// Only the first [`max_contacts`][Self::max_contacts] contacts are
    /// considered, and each contributes its impulse along its own normal.
    ///
    /// In [`UpdateMethod::FollowOrbit`] mode, the physics engine doesn't
    /// move the kinematic body at all, so every contact counts (the player's
    /// weighted by the player multiplier) and the sum is returned as a
    /// delta-v, divided by `mass`.
    ///
    /// In [`UpdateMethod::Forces`] mode the engine already resolved the
    /// collision, so only the player's extra push is returned, as an impulse.
    pub fn get_delta_v(&self, collision: &Collision, mass: f64) -> DVec2 {
        let follow_orbit = self.method == UpdateMethod::FollowOrbit;
        let multiplier = if follow_orbit {
            self.player_multiplier
        } else {
            self.player_multiplier - 1.0
        };

        let impulse: DVec2 = collision
            .contacts
            .iter()
            .take(self.max_contacts)
            .map(|contact| {
                let weight = match contact.actor {
                    ActorTag::Player => multiplier,
                    _ if follow_orbit => 1.0,
                    _ => 0.0,
                };
                contact.normal * (contact.normal_impulse * weight)
            })
            .sum();

        if follow_orbit {
            impulse / mass
        } else {
            impulse
        }
    }

    /// Pushes the body.
    ///
    /// In [`UpdateMethod::FollowOrbit`] mode, `force` is a delta-v, which
    /// the orbital body may reject if it would cross a radius limit.
    ///
    /// In [`UpdateMethod::Forces`] mode, `force` is an impulse on the rigid
    /// body. It is always applied, but while a radius limit is breached, a
    /// push that would make things worse is turned around: along the velocity
    /// above the maximum radius, or against it below the minimum radius.
    pub fn add_force(
        &self,
        time: f64,
        force: DVec2,
        body: &mut OrbitalBody,
        rb: &mut impl RigidBody2D,
    ) {
        match self.method {
            UpdateMethod::FollowOrbit => {
                if let Err(err) = body.add_delta_v(time, force) {
                    tracing::debug!(%err, "Push ignored");
                }
            }
            UpdateMethod::Forces => {
                let within_max = body.check_max_radius();
                let within_min = body.check_min_radius();

                let force_dot = force.normalize_or_zero().dot(rb.velocity().normalize_or_zero());
                let bounce = (!within_max && force_dot > 0.0) || (!within_min && force_dot < 0.0);

                let force = if bounce { -force } else { force };
                rb.add_force(force, ForceMode::Impulse);
            }
        }
    }

    /// Pushes the body along its direction of motion.
    ///
    /// This is the hook for enemy ships: a positive magnitude speeds the
    /// body up, a negative one slows it down.
    pub fn add_enemy_force(
        &self,
        time: f64,
        magnitude: f64,
        body: &mut OrbitalBody,
        rb: &mut impl RigidBody2D,
    ) {
        let force = body.prograde() * magnitude;
        self.add_force(time, force, body, rb);
    }

    /// Handles the first contact with another body.
    ///
    /// Touching the central body's surface raises
    /// [`OrbitEvent::MissionFailed`]; the collision impulse is applied
    /// either way.
    pub fn on_collision_enter(
        &self,
        time: f64,
        collision: &Collision,
        body: &mut OrbitalBody,
        rb: &mut impl RigidBody2D,
    ) {
        if collision.is_planet_impact() {
            tracing::info!("Barge hit planet.");
            body.push_event(OrbitEvent::MissionFailed);
        }

        self.on_collision_stay(time, collision, body, rb);
    }

    /// Handles continued contact with another body.
    pub fn on_collision_stay(
        &self,
        time: f64,
        collision: &Collision,
        body: &mut OrbitalBody,
        rb: &mut impl RigidBody2D,
    ) {
        let delta_v = self.get_delta_v(collision, rb.mass());
        self.add_force(time, delta_v, body, rb);
    }
}

impl Default for OrbitalRigidbody {
    fn default() -> Self {
        Self::new(&RigidbodyConfig::default())
    }
}
