//! Net gravitational acceleration from the registered point masses.

use na::Vector3;

use crate::kepler::G;
use crate::registry::BodyRegistry;

/// Read-only evaluator over a [`BodyRegistry`].
///
/// Pure: repeated queries with no registry mutation in between return
/// identical results. Multiple evaluators may read the same registry as long
/// as nothing mutates it concurrently.
#[derive(Copy, Clone, Debug)]
pub struct GravityField<'a> {
    registry: &'a BodyRegistry,
}

impl<'a> GravityField<'a> {
    pub fn new(registry: &'a BodyRegistry) -> Self {
        Self { registry }
    }

    /// Inverse-square sum over every registered body, pointing toward each
    /// attractor. `point` in [m], result in [m/s²]. Zero with an empty
    /// registry.
    ///
    /// A query exactly at a registered body's position is a singularity and
    /// yields non-finite components; callers placed on top of a body are
    /// expected not to ask.
    pub fn acceleration_at(&self, point: Vector3<f64>) -> Vector3<f64> {
        let mut accel = Vector3::zeros();

        for body in self.registry.sources() {
            let r = body.position - point;
            accel += r.normalize() * G * body.mass_kg / r.norm_squared();
        }

        accel
    }
}
