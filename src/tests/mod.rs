#![cfg(test)]

use core::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::{solve_keplers_equation, OrbitalElements, StateVectors2D, CIRCULAR_EPSILON};

const ORBIT_POLL_POINTS: usize = 512;

mod seeders;

use assertions::*;
use polling::*;
use seeders::*;

fn unit_orbit() -> OrbitalElements {
    OrbitalElements::new(0.0, 1.0, 0.0, 0.0, 1.0)
}

fn fit(mu: f64, time: f64, sv: StateVectors2D) -> OrbitalElements {
    let mut elements = OrbitalElements::default();
    elements.set_gravitational_parameter(mu);
    elements.set_orbit(time, sv.position, sv.velocity);
    elements
}

#[test]
fn unit_orbit_angle() {
    let orbit = unit_orbit();

    let tests = [
        ("unit orbit 1", 0.0 * PI, DVec2::new(1.0, 0.0)),
        ("unit orbit 2", 0.5 * PI, DVec2::new(0.0, 1.0)),
        ("unit orbit 3", 1.0 * PI, DVec2::new(-1.0, 0.0)),
        ("unit orbit 4", 1.5 * PI, DVec2::new(0.0, -1.0)),
        ("unit orbit 5", 2.0 * PI, DVec2::new(1.0, 0.0)),
    ];

    for (what, angle, expected) in tests {
        let pos = orbit.get_position_at_true_anomaly(angle);
        assert_almost_eq_vec2(pos, expected, what);
    }
}

#[test]
fn unit_orbit_transformation() {
    // arg_pe is zero, so the transformation should not do anything.
    let orbit = unit_orbit();

    let tests = [(1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)];

    for point in tests {
        let transformed = orbit.transform_pqw_vector(DVec2::new(point.0, point.1));

        assert_eq!(transformed.x, point.0);
        assert_eq!(transformed.y, point.1);
    }
}

#[test]
fn unit_orbit_period() {
    let orbit = unit_orbit();
    assert_almost_eq(orbit.get_orbital_period(), TAU, "unit orbit period");
    assert_almost_eq(orbit.get_mean_motion(), 1.0, "unit orbit mean motion");
}

#[test]
fn constructor_apsides() {
    let orbit = OrbitalElements::with_apoapsis(7000.0, 3000.0, 0.5, 0.0, 1.0e9);

    assert_almost_eq(orbit.get_periapsis(), 3000.0, "periapsis");
    assert_almost_eq(orbit.get_apoapsis(), 7000.0, "apoapsis");
    assert_almost_eq(orbit.get_semi_major_axis(), 5000.0, "semi-major axis");
    assert_almost_eq(
        orbit.get_semi_latus_rectum(),
        5000.0 * (1.0 - 0.16),
        "semi-latus rectum",
    );

    let mut orbit = orbit;
    assert_almost_eq_vec2(
        orbit.to_cartesian(0.0).position,
        DVec2::from_angle(0.5) * 3000.0,
        "position at epoch",
    );
}

#[test]
fn solver_convergence() {
    for e_step in 0..=19 {
        let e = e_step as f64 * 0.05;

        for m_step in 0..629 {
            let mean_anomaly = m_step as f64 * 0.01;
            let ecc_anom = solve_keplers_equation(mean_anomaly, e);

            let residual = ecc_anom - e * ecc_anom.sin() - mean_anomaly;
            let wrapped = (residual + PI).rem_euclid(TAU) - PI;

            assert!(
                wrapped.abs() < 1e-10,
                "residual {wrapped} for e = {e}, M = {mean_anomaly} (E = {ecc_anom})"
            );
        }
    }
}

#[test]
fn solver_convergence_random() {
    for _ in 0..65536 {
        let e = rand::random_range(0.0..0.999);
        let mean_anomaly = rand::random_range(-100.0..100.0);
        let ecc_anom = solve_keplers_equation(mean_anomaly, e);

        let residual = ecc_anom - e * ecc_anom.sin() - mean_anomaly;
        let wrapped = (residual + PI).rem_euclid(TAU) - PI;

        assert!(
            wrapped.abs() < 1e-10,
            "residual {wrapped} for e = {e}, M = {mean_anomaly} (E = {ecc_anom})"
        );
        assert!(ecc_anom.abs() <= PI, "E = {ecc_anom} out of range");
    }
}

#[test]
fn solver_non_finite() {
    assert!(solve_keplers_equation(f64::NAN, 0.5).is_nan());
    assert!(solve_keplers_equation(f64::INFINITY, 0.5).is_nan());
    assert!(solve_keplers_equation(f64::NEG_INFINITY, 0.0).is_nan());
    assert!(solve_keplers_equation(1.0, f64::NAN).is_nan());
}

#[test]
fn solver_circular_identity() {
    for m_step in -20..=20 {
        let mean_anomaly = m_step as f64 * 0.15;
        let ecc_anom = solve_keplers_equation(mean_anomaly, 0.0);
        assert_almost_eq(ecc_anom, mean_anomaly, "E = M for circular orbits");
    }
}

fn round_trip_base_test(orbit: &mut OrbitalElements, clockwise: bool) {
    let mu = orbit.get_gravitational_parameter();
    let period = orbit.get_orbital_period();
    let fit_time = rand::random_range(-1.0..1.0) * period;
    let later = fit_time + rand::random_range(0.0..2.0) * period;

    let orient = |sv: StateVectors2D| if clockwise { mirror(sv) } else { sv };

    let sv = orient(orbit.to_cartesian(fit_time));
    let mut fitted = fit(mu, fit_time, sv);

    let what = format!("{orbit:?} (clockwise: {clockwise}) fitted as {fitted:?}");

    assert_almost_eq(
        fitted.get_eccentricity(),
        orbit.get_eccentricity(),
        &format!("eccentricity of {what}"),
    );
    assert_almost_eq(
        fitted.get_semi_major_axis().log2(),
        orbit.get_semi_major_axis().log2(),
        &format!("log of semi-major axis of {what}"),
    );
    assert_eq!(
        fitted.get_direction(),
        if clockwise { -1.0 } else { 1.0 },
        "direction of {what}"
    );

    assert_almost_eq_sv(
        fitted.to_cartesian(fit_time),
        sv,
        &format!("state at fit time of {what}"),
    );
    assert_almost_eq_sv(
        fitted.to_cartesian(later),
        orient(orbit.to_cartesian(later)),
        &format!("state at t = {later} of {what}"),
    );
}

#[test]
fn round_trip() {
    for mut orbit in random_bound_iter(16384) {
        round_trip_base_test(&mut orbit, false);
        round_trip_base_test(&mut orbit, true);
    }
}

#[test]
fn periodicity() {
    for mut orbit in random_bound_iter(4096) {
        let period = orbit.get_orbital_period();
        let start = rand::random_range(-1.0..1.0) * period;

        let first_times = poll_times(&orbit, start);
        let second_times = poll_times(&orbit, start + period);
        let first = poll_sv(&mut orbit, &first_times);
        let second = poll_sv(&mut orbit, &second_times);

        for (i, (a, b)) in first.into_iter().zip(second).enumerate() {
            assert_almost_eq_sv(a, b, &format!("sample {i} one period apart for {orbit:?}"));
        }
    }
}

#[test]
fn energy_is_conserved() {
    for mut orbit in random_bound_iter(1024) {
        let mu = orbit.get_gravitational_parameter();
        let expected = orbit.get_specific_energy();

        let times = poll_times(&orbit, 0.0);
        for sv in poll_sv(&mut orbit, &times) {
            let energy = sv.velocity.length_squared() / 2.0 - mu / sv.position.length();
            assert_almost_eq(
                (energy / expected).log2(),
                0.0,
                &format!("specific energy of {orbit:?}"),
            );
        }
    }
}

#[test]
fn circular_fit() {
    let mu: f64 = 1.0e9;
    let mut orbit = OrbitalElements::default();
    orbit.set_gravitational_parameter(mu);
    orbit.set_circular_orbit(3.0, DVec2::new(5000.0, 0.0));

    assert_eq!(orbit.get_eccentricity(), 0.0);
    assert_eq!(orbit.get_periapsis(), 5000.0);
    assert_eq!(orbit.get_apoapsis(), 5000.0);
    assert_eq!(orbit.get_epoch(), 3.0);

    let sv = orbit.to_cartesian(3.0);
    assert_almost_eq_vec2(sv.position, DVec2::new(5000.0, 0.0), "position at epoch");
    assert_almost_eq_vec2(
        sv.velocity,
        DVec2::new(0.0, (mu / 5000.0).sqrt()),
        "velocity at epoch",
    );
    assert_almost_eq(
        orbit.get_circular_speed(),
        (mu / 5000.0).sqrt(),
        "circular speed",
    );

    // A quarter period later, the body is a quarter turn along.
    let quarter = orbit.get_orbital_period() / 4.0;
    assert_almost_eq_vec2_rescale(
        orbit.to_cartesian(3.0 + quarter).position,
        DVec2::new(0.0, 5000.0),
        "position a quarter period later",
    );
}

#[test]
fn near_circular_fit_uses_position_direction() {
    for orbit in (0..1024).map(|_| random_circular()) {
        let mut orbit = orbit;
        let mu = orbit.get_gravitational_parameter();
        let sv = orbit.to_cartesian(0.0);
        let fitted = fit(mu, 0.0, sv);

        assert!(
            fitted.get_eccentricity() < CIRCULAR_EPSILON,
            "eccentricity of {fitted:?}"
        );
        assert_eq!(fitted.get_true_anomaly(), 0.0);
        assert_eq!(
            fitted.get_arg_pe(),
            sv.position.y.atan2(sv.position.x),
            "arg pe of {fitted:?}"
        );
        assert!(fitted.is_finite());
    }
}

#[test]
fn apsis_tie_break_is_outbound() {
    let mu: f64 = 1.0e9;

    let at_periapsis = periapsis_state(mu, 3000.0, 7000.0);
    let fitted = fit(mu, 0.0, at_periapsis);
    assert_almost_eq(fitted.get_true_anomaly(), 0.0, "true anomaly at periapsis");

    let apoapsis_speed = (mu * (2.0 / 7000.0 - 1.0 / 5000.0)).sqrt();
    let fitted = fit(
        mu,
        0.0,
        StateVectors2D {
            position: DVec2::new(7000.0, 0.0),
            velocity: DVec2::new(0.0, apoapsis_speed),
        },
    );
    let true_anomaly = fitted.get_true_anomaly();
    assert!(
        (0.0..=PI).contains(&true_anomaly),
        "true anomaly {true_anomaly} at apoapsis"
    );
    assert_almost_eq(true_anomaly, PI, "true anomaly at apoapsis");
}

#[test]
fn degenerate_fit_is_non_finite() {
    let mu: f64 = 1.0e9;

    let at_origin = fit(
        mu,
        0.0,
        StateVectors2D {
            position: DVec2::ZERO,
            velocity: DVec2::new(0.0, 400.0),
        },
    );
    assert!(!at_origin.is_finite());

    let mut at_origin = at_origin;
    assert!(!at_origin.to_cartesian(1.0).is_finite());
}

#[test]
fn unbound_fit_is_not_bound() {
    let mu: f64 = 1.0e9;
    let escape = (2.0 * mu / 5000.0).sqrt();

    let fitted = fit(
        mu,
        0.0,
        StateVectors2D {
            position: DVec2::new(5000.0, 0.0),
            velocity: DVec2::new(0.0, escape * 1.5),
        },
    );
    assert!(!fitted.is_bound());
    assert!(fitted.is_finite());
    assert!(fitted.get_orbital_period().is_nan());
}

fn sampling_base_test(orbit: &OrbitalElements) {
    let points = poll_coordinates(orbit);
    let e = orbit.get_eccentricity();
    let p = orbit.get_semi_latus_rectum();
    let dir = orbit.get_direction();

    for (i, &point) in points.iter().enumerate() {
        let true_anomaly = TAU * i as f64 / ORBIT_POLL_POINTS as f64;
        let altitude = p / (1.0 + e * true_anomaly.cos());
        let expected = DVec2::from_angle(orbit.get_arg_pe() + dir * true_anomaly) * altitude;

        assert_almost_eq_vec2_rescale(
            point,
            expected,
            &format!("sample {i} of {orbit:?}"),
        );
    }

    for (i, pair) in points.windows(2).enumerate() {
        let turn = pair[0].perp_dot(pair[1]);
        assert_eq!(
            turn.signum(),
            dir,
            "samples {i} and {} go against the motion of {orbit:?}",
            i + 1
        );
    }
}

#[test]
fn orbit_sampling() {
    for mut orbit in random_bound_iter(1024) {
        sampling_base_test(&orbit);

        let sv = mirror(orbit.to_cartesian(0.0));
        let clockwise = fit(orbit.get_gravitational_parameter(), 0.0, sv);
        sampling_base_test(&clockwise);
    }
}

#[test]
fn orbit_sampling_ignores_time() {
    let mut orbit = OrbitalElements::new(0.4, 3000.0, 1.0, 0.0, 1.0e9);
    let before = poll_coordinates(&orbit);

    orbit.to_cartesian(123.0);
    let after = poll_coordinates(&orbit);

    for (a, b) in before.into_iter().zip(after) {
        assert_eq_vec2(a, b, "sample before and after propagation");
    }
}

#[test]
fn anomaly_conversions() {
    for orbit in random_bound_iter(4096) {
        let true_anomaly = rand::random_range(-PI..PI);
        let ecc_anom = orbit.get_eccentric_anomaly_at_true_anomaly(true_anomaly);
        let back = orbit.get_true_anomaly_at_eccentric_anomaly(ecc_anom);

        assert_almost_eq(back, true_anomaly, &format!("true anomaly of {orbit:?}"));

        let mean_anomaly = orbit.get_mean_anomaly_at_true_anomaly(true_anomaly);
        let solved = orbit.get_eccentric_anomaly_at_mean_anomaly(mean_anomaly);

        assert_almost_eq(solved, ecc_anom, &format!("eccentric anomaly of {orbit:?}"));
    }
}

#[test]
fn to_cartesian_records_true_anomaly() {
    let mut orbit = OrbitalElements::new(0.5, 3000.0, 0.0, 0.0, 1.0e9);
    let half_period = orbit.get_orbital_period() / 2.0;

    orbit.to_cartesian(half_period);
    assert_almost_eq(orbit.get_true_anomaly(), PI, "true anomaly at apoapsis");

    let stats_before = orbit.get_mean_anomaly_at_epoch();
    orbit.to_cartesian(half_period * 1.5);
    assert_eq!(orbit.get_mean_anomaly_at_epoch(), stats_before);
}
