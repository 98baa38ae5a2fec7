pub extern crate nalgebra as na;

pub mod gravity;
pub mod kepler;
pub mod planet;
pub mod registry;
pub mod scenario;
pub mod ship;
pub mod system;
pub mod units;
pub mod viz;

pub trait SimulationComponent<'a> {
    /// The type for state that is shared between multiple components; e.g. the
    /// view state markers are placed into.
    type SharedState;

    /// The type for the environment structure that is scoped to this component.
    type Environment;

    fn init(&mut self, _env: &'a Self::Environment, _shared_state: &mut Self::SharedState) {}

    fn step(
        &mut self,
        dt: units::Time,
        env: &'a Self::Environment,
        common_state: &mut Self::SharedState,
    );
}
