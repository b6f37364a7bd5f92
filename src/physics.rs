//! The seam to the rigid-body physics engine.
//!
//! Orbital drivers don't own their rigid bodies. They read and write them
//! through [`RigidBody2D`], and receive collisions as lists of [`Contact`]s
//! produced by whatever does the collision detection.
//!
//! [`PointMassBody`] is a small implementation of the trait, good enough
//! to run a [`Simulation`][crate::Simulation] without an engine.

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a force passed to [`RigidBody2D::add_force`] is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForceMode {
    /// A continuous force, integrated over the next physics step.
    Force,
    /// An instantaneous change in momentum.
    Impulse,
}

/// Read and write access to a rigid body in the physics engine.
///
/// Rotations are in degrees, counter-clockwise from the +X axis.
pub trait RigidBody2D {
    /// Gets the position of the body.
    fn position(&self) -> DVec2;

    /// Gets the velocity of the body.
    fn velocity(&self) -> DVec2;

    /// Gets the rotation of the body, in degrees.
    fn rotation(&self) -> f64;

    /// Gets the mass of the body.
    fn mass(&self) -> f64;

    /// Returns `true` if the body ignores forces and is moved by hand.
    fn is_kinematic(&self) -> bool;

    /// Sets whether the body ignores forces and is moved by hand.
    fn set_kinematic(&mut self, kinematic: bool);

    /// Overwrites the velocity of the body.
    fn set_velocity(&mut self, velocity: DVec2);

    /// Moves the body to a position during the next physics step.
    fn move_position(&mut self, position: DVec2);

    /// Sets the rotation of the body, in degrees.
    fn set_rotation(&mut self, degrees: f64);

    /// Applies a force or an impulse to the body.
    ///
    /// Kinematic bodies ignore this.
    fn add_force(&mut self, force: DVec2, mode: ForceMode);
}

/// What a collision was against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActorTag {
    /// The player's ship.
    Player,
    /// The surface of the central body.
    Planet,
    /// Anything else, such as enemies or debris.
    Other,
}

/// A single contact point of a collision.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The impulse applied along the normal to resolve the contact.
    pub normal_impulse: f64,
    /// The unit normal of the contact, pointing into this body.
    pub normal: DVec2,
    /// Who owns the rigid body on the other side of this contact.
    pub actor: ActorTag,
}

/// A collision between a body and some other actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collision {
    /// Who the body collided with.
    pub other: Option<ActorTag>,
    /// The contact points of the collision.
    pub contacts: Vec<Contact>,
}

impl Collision {
    /// Creates a collision against an actor with the given contacts.
    pub fn new(other: ActorTag, contacts: Vec<Contact>) -> Self {
        Self {
            other: Some(other),
            contacts,
        }
    }

    /// Returns `true` if the collision is against the central body's surface.
    pub fn is_planet_impact(&self) -> bool {
        self.other == Some(ActorTag::Planet)
    }
}

/// A rigid body reduced to a point mass.
///
/// Forces accumulate until the next [`integrate`][Self::integrate] call,
/// which applies them with a kick-then-drift (semi-implicit Euler) step.
/// Impulses change the velocity right away.
///
/// # Example
/// ```
/// use glam::DVec2;
/// use orbital_barge::{ForceMode, PointMassBody, RigidBody2D};
///
/// let mut body = PointMassBody::new(DVec2::ZERO, DVec2::ZERO, 2.0);
/// body.add_force(DVec2::new(4.0, 0.0), ForceMode::Impulse);
/// assert_eq!(body.velocity(), DVec2::new(2.0, 0.0));
///
/// body.integrate(0.5);
/// assert_eq!(body.position(), DVec2::new(1.0, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointMassBody {
    position: DVec2,
    velocity: DVec2,
    rotation: f64,
    mass: f64,
    kinematic: bool,
    force: DVec2,
    target_position: Option<DVec2>,
}

impl PointMassBody {
    /// Creates a dynamic body.
    pub fn new(position: DVec2, velocity: DVec2, mass: f64) -> Self {
        Self {
            position,
            velocity,
            rotation: 0.0,
            mass,
            kinematic: false,
            force: DVec2::ZERO,
            target_position: None,
        }
    }

    /// Advances the body by one physics step.
    pub fn integrate(&mut self, dt: f64) {
        if self.kinematic {
            self.force = DVec2::ZERO;
            match self.target_position.take() {
                Some(target) => self.position = target,
                None => self.position += self.velocity * dt,
            }
            return;
        }

        // Kick
        self.velocity += self.force / self.mass * dt;
        self.force = DVec2::ZERO;
        // Drift
        self.position += self.velocity * dt;
    }

    /// Gets the force accumulated since the last step.
    pub fn accumulated_force(&self) -> DVec2 {
        self.force
    }
}

impl Default for PointMassBody {
    fn default() -> Self {
        Self::new(DVec2::ZERO, DVec2::ZERO, 1.0)
    }
}

impl RigidBody2D for PointMassBody {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn velocity(&self) -> DVec2 {
        self.velocity
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    fn move_position(&mut self, position: DVec2) {
        if self.kinematic {
            self.target_position = Some(position);
        } else {
            self.position = position;
        }
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn add_force(&mut self, force: DVec2, mode: ForceMode) {
        if self.kinematic {
            return;
        }
        match mode {
            ForceMode::Force => self.force += force,
            ForceMode::Impulse => self.velocity += force / self.mass,
        }
    }
}
