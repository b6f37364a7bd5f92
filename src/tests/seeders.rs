use core::f64::consts::TAU;

use glam::DVec2;

use crate::{OrbitalElements, StateVectors2D};

pub(super) fn random_circular() -> OrbitalElements {
    OrbitalElements::new(
        0.0,
        rand::random_range(1.0..1e6),
        rand::random_range(-TAU..TAU),
        rand::random_range(-TAU..TAU),
        rand::random_range(1.0..1e12),
    )
}

pub(super) fn random_elliptic() -> OrbitalElements {
    OrbitalElements::new(
        rand::random_range(0.01..0.9),
        rand::random_range(1.0..1e6),
        rand::random_range(-TAU..TAU),
        rand::random_range(-TAU..TAU),
        rand::random_range(1.0..1e12),
    )
}

pub(super) fn random_highly_elliptic() -> OrbitalElements {
    OrbitalElements::new(
        rand::random_range(0.9..0.99),
        rand::random_range(1.0..1e6),
        rand::random_range(-TAU..TAU),
        rand::random_range(-TAU..TAU),
        rand::random_range(1.0..1e12),
    )
}

pub(super) fn random_bound() -> OrbitalElements {
    const FNS: &[fn() -> OrbitalElements] =
        &[random_circular, random_elliptic, random_highly_elliptic];

    let i = rand::random_range(0..FNS.len());

    FNS[i]()
}

pub(super) fn random_bound_iter(iters: usize) -> impl Iterator<Item = OrbitalElements> {
    (0..iters).map(|_| random_bound())
}

/// Mirrors a state across the X axis, turning a counter-clockwise
/// orbit into a clockwise one.
pub(super) fn mirror(sv: StateVectors2D) -> StateVectors2D {
    StateVectors2D {
        position: DVec2::new(sv.position.x, -sv.position.y),
        velocity: DVec2::new(sv.velocity.x, -sv.velocity.y),
    }
}

/// Gets a state at periapsis, on the +X axis moving counter-clockwise,
/// for an orbit with the given apsides.
pub(super) fn periapsis_state(mu: f64, periapsis: f64, apoapsis: f64) -> StateVectors2D {
    let semi_major_axis = (periapsis + apoapsis) / 2.0;
    let speed = (mu * (2.0 / periapsis - 1.0 / semi_major_axis)).sqrt();

    StateVectors2D {
        position: DVec2::new(periapsis, 0.0),
        velocity: DVec2::new(0.0, speed),
    }
}
