//! The set of currently gravitating bodies.
//!
//! An explicit value owned by the simulation system rather than process
//! state, so independent systems (and tests) can coexist.

use orrery_types::prelude::BodyIndex;
use std::collections::HashMap;

/// One gravity source: a point mass at its most recently propagated position.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GravitySource {
    /// Mass [kg]
    pub mass_kg: f64,

    /// Position [m], expressed in the system reference frame
    pub position: na::Vector3<f64>,
}

/// Membership mirrors Keplerian body lifetime: a body is registered once its
/// primary and mean motion are established, and unregistered synchronously
/// with its destruction. Iteration order is unspecified and only affects
/// floating-point summation order.
#[derive(Clone, Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<BodyIndex, GravitySource>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, index: BodyIndex, source: GravitySource) {
        self.bodies.insert(index, source);
    }

    /// No-op when `index` is not a member.
    pub fn unregister(&mut self, index: BodyIndex) {
        self.bodies.remove(&index);
    }

    /// Refresh a member's position after propagation. No-op for non-members
    /// (a body that lost its primary mid-flight keeps its last position).
    pub fn update_position(&mut self, index: BodyIndex, position: na::Vector3<f64>) {
        if let Some(source) = self.bodies.get_mut(&index) {
            source.position = position;
        }
    }

    pub fn contains(&self, index: BodyIndex) -> bool {
        self.bodies.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = &GravitySource> {
        self.bodies.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::Vector3;

    #[test]
    fn unregister_is_idempotent() {
        let mut reg = BodyRegistry::new();
        reg.register(
            0,
            GravitySource {
                mass_kg: 1.0,
                position: Vector3::zeros(),
            },
        );
        assert_eq!(reg.len(), 1);

        reg.unregister(0);
        assert!(reg.is_empty());

        // Removing a non-member does nothing
        reg.unregister(0);
        reg.unregister(7);
        assert!(reg.is_empty());
    }

    #[test]
    fn update_position_skips_non_members() {
        let mut reg = BodyRegistry::new();
        reg.update_position(3, Vector3::new(1.0, 2.0, 3.0));
        assert!(!reg.contains(3));
    }
}
