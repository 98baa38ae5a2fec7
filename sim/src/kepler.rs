//! Closed-form two-body propagation from classical orbital elements.
//!
//! Elements carry kilometers and degrees at the boundary; everything in
//! here runs in SI. Callers report kilometers through
//! [`StateVector::position_km`](orrery_types::state::StateVector::position_km).

use na::Vector3;
use orrery_types::prelude::{KeplerianElements, StateVector};
use thiserror::Error;

use crate::units::{Angle, AngularVelocity, Ratio, Time};

/// Gravitational constant [m³·kg⁻¹·s⁻²]
pub const G: f64 = 6.6725985e-11;

/// Convergence tolerance on the eccentric anomaly [rad]
const SOLVER_TOLERANCE: f64 = 1e-6;

/// Near-parabolic eccentricities can stall the Newton iteration, so it is
/// bounded rather than run to convergence.
const SOLVER_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Error)]
pub enum KeplerError {
    #[error(
        "Kepler's equation did not converge after {iterations} iterations (e = {eccentricity}, M = {mean_anomaly_deg}°)"
    )]
    NoConvergence {
        iterations: usize,
        eccentricity: f64,
        mean_anomaly_deg: f64,
    },
}

/// Mean motion n = sqrt(μ / a³) [rad/s], with μ = G · (primary mass + own mass).
///
/// Constant for a body unless its semimajor axis or the masses change.
pub fn mean_motion(elements: &KeplerianElements, primary_mass_kg: f64) -> AngularVelocity {
    let a = elements.semimajor_axis_km * 1000.0;
    let mu = G * (primary_mass_kg + elements.mass_kg);
    AngularVelocity::from_radians_per_second((mu / (a * a * a)).sqrt())
}

/// Advance a mean anomaly by `dt` scaled by the simulation multiplier and
/// reduce it into [0, 360).
pub fn advance_mean_anomaly(
    mean_anomaly: Angle,
    mean_motion: AngularVelocity,
    dt: Time,
    time_scale: Ratio,
) -> Angle {
    (mean_anomaly + mean_motion * (dt * time_scale)).wrapped_full_turn()
}

/// Solve E − e·sin(E) = M for the eccentric anomaly with Newton iteration
/// seeded at E₀ = M + e/2.
fn eccentric_anomaly(mean_anomaly_rad: f64, eccentricity: f64) -> Result<f64, KeplerError> {
    let m = mean_anomaly_rad;
    let e = eccentricity;

    let mut eca = m + e / 2.0;
    for _ in 0..SOLVER_MAX_ITERATIONS {
        let next = eca - (eca - e * eca.sin() - m) / (1.0 - e * eca.cos());
        let diff = (next - eca).abs();
        eca = next;
        if diff < SOLVER_TOLERANCE {
            return Ok(eca);
        }
    }

    Err(KeplerError::NoConvergence {
        iterations: SOLVER_MAX_ITERATIONS,
        eccentricity: e,
        mean_anomaly_deg: m.to_degrees(),
    })
}

/// Elements + mean anomaly → Cartesian state relative to the primary, SI units.
///
/// Solves for the eccentric anomaly, evaluates the perifocal-plane state,
/// then rotates through the direction-cosine rows built from ω, i, Ω.
pub fn propagate(
    elements: &KeplerianElements,
    primary_mass_kg: f64,
) -> Result<StateVector, KeplerError> {
    let a = elements.semimajor_axis_km * 1000.0;
    let ec = elements.eccentricity;
    let i = elements.inclination_deg.to_radians();
    let w0 = elements.arg_periapsis_deg.to_radians();
    let o0 = elements.ascending_node_deg.to_radians();
    let m0 = elements.mean_anomaly_deg.to_radians();

    let mu = G * (primary_mass_kg + elements.mass_kg);

    let eca = eccentric_anomaly(m0, ec)?;
    let ceca = eca.cos();
    let seca = eca.sin();

    // Perifocal-plane state; b is the semi-minor axis
    let b = a * (1.0 - ec * ec).abs().sqrt();
    let xw = a * (ceca - ec);
    let yw = b * seca;

    let edot = (mu / a).sqrt() / (a * (1.0 - ec * ceca));
    let xdw = -a * edot * seca;
    let ydw = b * edot * ceca;

    // Direction-cosine rows: P carries the perifocal x̂ axis into the
    // reference frame, Q carries ŷ
    let cw = w0.cos();
    let sw = w0.sin();
    let co = o0.cos();
    let so = o0.sin();
    let ci = i.cos();
    let si = i.sin();
    let p = Vector3::new(cw * co - so * sw * ci, cw * so + co * sw * ci, sw * si);
    let q = Vector3::new(-sw * co - so * cw * ci, -sw * so + co * cw * ci, cw * si);

    Ok(StateVector::new(
        p * xw + q * yw,
        p * xdw + q * ydw,
    ))
}

/// Position the orbit passes through at an arbitrary mean anomaly, relative
/// to the primary [m]. The element set itself is left untouched.
pub fn position_at_mean_anomaly(
    elements: &KeplerianElements,
    primary_mass_kg: f64,
    mean_anomaly: Angle,
) -> Result<Vector3<f64>, KeplerError> {
    let mut at = *elements;
    at.mean_anomaly_deg = mean_anomaly.wrapped_full_turn().as_degrees();
    Ok(propagate(&at, primary_mass_kg)?.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EARTH_MASS_KG: f64 = 5.972e24;

    fn elements(eccentricity: f64, semimajor_axis_km: f64, mean_anomaly_deg: f64) -> KeplerianElements {
        KeplerianElements {
            mass_kg: 1000.0,
            eccentricity,
            semimajor_axis_km,
            inclination_deg: 0.0,
            ascending_node_deg: 0.0,
            arg_periapsis_deg: 0.0,
            mean_anomaly_deg,
        }
    }

    #[test]
    fn periapsis_at_zero_mean_anomaly() {
        let el = elements(0.3, 10_000.0, 0.0);
        let state = propagate(&el, EARTH_MASS_KG).unwrap();
        let pos_km = state.position_km();

        // Distance a(1 − e) along the periapsis direction
        assert_relative_eq!(pos_km.norm(), 10_000.0 * (1.0 - 0.3), max_relative = 1e-6);
        assert_relative_eq!(pos_km.x, 7000.0, max_relative = 1e-6);
        assert_relative_eq!(pos_km.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pos_km.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn apoapsis_at_half_turn() {
        let el = elements(0.3, 10_000.0, 180.0);
        let state = propagate(&el, EARTH_MASS_KG).unwrap();

        assert_relative_eq!(
            state.position_km().norm(),
            10_000.0 * (1.0 + 0.3),
            max_relative = 1e-6
        );
    }

    #[test]
    fn mean_anomaly_advance_wraps() {
        // 1 °/s for 20 s starting near the top of the revolution
        let n = AngularVelocity::from_degrees_per_second(1.0);
        let m = advance_mean_anomaly(
            Angle::from_degrees(350.0),
            n,
            Time::from_secs(20.0),
            Ratio::from_f64(1.0),
        );
        assert_relative_eq!(m.as_degrees(), 10.0, max_relative = 1e-9);

        // Negative increments wrap up into range
        let m = advance_mean_anomaly(
            Angle::from_degrees(10.0),
            n,
            Time::from_secs(-20.0),
            Ratio::from_f64(1.0),
        );
        assert_relative_eq!(m.as_degrees(), 350.0, max_relative = 1e-9);

        // Multi-revolution increments reduce instead of single-step wrapping
        let m = advance_mean_anomaly(
            Angle::from_degrees(45.0),
            n,
            Time::from_secs(10.0),
            Ratio::from_f64(100.0),
        );
        assert!(m.as_degrees() >= 0.0 && m.as_degrees() < 360.0);
        assert_relative_eq!(m.as_degrees(), (45.0f64 + 1000.0).rem_euclid(360.0), max_relative = 1e-9);
    }

    #[test]
    fn full_period_returns_to_start() {
        let el = elements(0.1, 7000.0, 45.0);
        let n = mean_motion(&el, EARTH_MASS_KG);
        let period = Time::from_secs(2.0 * std::f64::consts::PI / n.as_radians_per_second());

        let start = propagate(&el, EARTH_MASS_KG).unwrap();

        let mut advanced = el;
        advanced.mean_anomaly_deg =
            advance_mean_anomaly(Angle::from_degrees(el.mean_anomaly_deg), n, period, Ratio::from_f64(1.0))
                .as_degrees();
        let end = propagate(&advanced, EARTH_MASS_KG).unwrap();

        assert_relative_eq!(start.position, end.position, epsilon = 50.0, max_relative = 1e-5);
        assert_relative_eq!(start.velocity, end.velocity, epsilon = 1e-2, max_relative = 1e-5);
    }

    #[test]
    fn circular_orbit_quarter_period() {
        let el = elements(0.0, 7000.0, 0.0);
        let n = mean_motion(&el, EARTH_MASS_KG);
        let quarter = Time::from_secs(0.5 * std::f64::consts::PI / n.as_radians_per_second());

        let start = propagate(&el, EARTH_MASS_KG).unwrap();
        assert_relative_eq!(start.position_km().norm(), 7000.0, max_relative = 1e-6);

        let mut advanced = el;
        advanced.mean_anomaly_deg =
            advance_mean_anomaly(Angle::from_degrees(0.0), n, quarter, Ratio::from_f64(1.0))
                .as_degrees();
        assert_relative_eq!(advanced.mean_anomaly_deg, 90.0, max_relative = 1e-9);

        // ~90° around with unchanged radius
        let end = propagate(&advanced, EARTH_MASS_KG).unwrap();
        assert_relative_eq!(end.position_km().norm(), 7000.0, max_relative = 1e-6);
        assert_relative_eq!(end.position_km().x, 0.0, epsilon = 1e-2);
        assert_relative_eq!(end.position_km().y, 7000.0, max_relative = 1e-6);
    }

    #[test]
    fn mean_motion_matches_leo_period() {
        let el = elements(0.0, 7000.0, 0.0);
        let n = mean_motion(&el, EARTH_MASS_KG);
        let period_s = 2.0 * std::f64::consts::PI / n.as_radians_per_second();

        // ~97 minute low orbit
        assert_relative_eq!(period_s, 5828.5, max_relative = 1e-3);
    }

    #[test]
    fn solver_satisfies_keplers_equation_at_high_eccentricity() {
        let m = 0.3;
        let e = 0.99;
        let eca = eccentric_anomaly(m, e).unwrap();
        assert_relative_eq!(eca - e * eca.sin(), m, epsilon = 1e-6);
    }

    #[test]
    fn solver_surfaces_the_iteration_cap() {
        // A non-finite anomaly can never satisfy the tolerance check; the
        // bounded loop turns that into an error instead of a hang.
        let err = eccentric_anomaly(f64::NAN, 0.5).unwrap_err();
        assert!(matches!(
            err,
            KeplerError::NoConvergence {
                iterations: SOLVER_MAX_ITERATIONS,
                ..
            }
        ));

        let mut el = elements(0.5, 10_000.0, 0.0);
        el.mean_anomaly_deg = f64::NAN;
        assert!(propagate(&el, EARTH_MASS_KG).is_err());
    }

    #[test]
    fn position_at_anomaly_leaves_elements_alone() {
        let el = elements(0.3, 10_000.0, 45.0);
        let apoapsis = position_at_mean_anomaly(&el, EARTH_MASS_KG, Angle::from_degrees(180.0)).unwrap();

        assert_relative_eq!(apoapsis.norm() / 1000.0, 13_000.0, max_relative = 1e-6);
        assert_relative_eq!(el.mean_anomaly_deg, 45.0);
    }

    #[test]
    fn inclined_orbit_leaves_the_reference_plane() {
        let mut el = elements(0.0, 7000.0, 90.0);
        el.inclination_deg = 90.0;
        let state = propagate(&el, EARTH_MASS_KG).unwrap();

        // With i = 90° and M = E = 90°, the position is along the orbit
        // normal's former ŷ, now rotated to ẑ
        assert_relative_eq!(state.position_km().norm(), 7000.0, max_relative = 1e-6);
        assert_relative_eq!(state.position_km().z.abs(), 7000.0, max_relative = 1e-4);
    }
}
