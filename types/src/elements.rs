use derive_more::Display;

/// Classical orbital element set for a closed (elliptical) orbit,
/// plus the owning body's mass.
///
/// Angles are degrees at this boundary; the propagator converts to
/// radians internally.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display)]
#[display(
    fmt = "{{e: {}, a: {} km, i: {}°, M: {}°}}",
    "eccentricity",
    "semimajor_axis_km",
    "inclination_deg",
    "mean_anomaly_deg"
)]
pub struct KeplerianElements {
    /// Mass [kg]
    pub mass_kg: f64,

    /// Eccentricity (e), 0 <= e < 1
    pub eccentricity: f64,

    /// Semimajor axis (a) [km]
    pub semimajor_axis_km: f64,

    /// Inclination (i) [deg]
    pub inclination_deg: f64,

    /// Longitude of the ascending node (Ω) [deg]
    pub ascending_node_deg: f64,

    /// Argument of periapsis (ω) [deg]
    pub arg_periapsis_deg: f64,

    /// Mean anomaly (M) [deg], wrapped to [0, 360)
    pub mean_anomaly_deg: f64,
}
