use derive_more::Display;

/// Translational kinematic state, expressed in the system reference frame.
///
/// Internal computation is SI; the `*_km` accessors are the reporting
/// boundary shared by Keplerian and free bodies so both kinds compose in
/// the same display frame.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display)]
#[display(fmt = "{{pos: {}, vel: {}}}", "position", "velocity")]
pub struct StateVector {
    /// Position [m]
    pub position: na::Vector3<f64>,

    /// Velocity [m/s]
    pub velocity: na::Vector3<f64>,
}

impl StateVector {
    pub fn new(position: na::Vector3<f64>, velocity: na::Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    /// Position [km]
    pub fn position_km(&self) -> na::Vector3<f64> {
        self.position / 1000.0
    }

    /// Velocity [km/s]
    pub fn velocity_km_s(&self) -> na::Vector3<f64> {
        self.velocity / 1000.0
    }

    /// Orthonormal triple derived from the current state.
    ///
    /// Always recomputed, never cached. Degenerate (non-finite components)
    /// when velocity is parallel to position.
    pub fn orbital_frame(&self) -> OrbitalFrame {
        let radial_out = self.position.normalize();
        let normal = self.position.cross(&self.velocity).normalize();
        let prograde = normal.cross(&radial_out).normalize();
        OrbitalFrame {
            radial_out,
            normal,
            prograde,
        }
    }
}

/// Unit vectors framing a body's instantaneous orbit, for visual framing
/// by external consumers.
#[derive(Copy, Clone, PartialEq, Debug, Display)]
#[display(
    fmt = "{{radial: {}, normal: {}, prograde: {}}}",
    "radial_out",
    "normal",
    "prograde"
)]
pub struct OrbitalFrame {
    /// Directly away from the gravity well
    pub radial_out: na::Vector3<f64>,

    /// Orthogonal to the orbital plane, right-hand rule along the motion
    pub normal: na::Vector3<f64>,

    /// Direction of the orbit
    pub prograde: na::Vector3<f64>,
}

impl OrbitalFrame {
    /// Directly into the gravity well
    pub fn radial_in(&self) -> na::Vector3<f64> {
        -self.radial_out
    }

    /// Orthogonal to the orbital plane, opposite the right-hand rule
    pub fn anti_normal(&self) -> na::Vector3<f64> {
        -self.normal
    }

    /// Opposite the direction of the orbit
    pub fn retrograde(&self) -> na::Vector3<f64> {
        -self.prograde
    }
}
