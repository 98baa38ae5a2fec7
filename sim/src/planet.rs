//! A body riding a scripted Keplerian orbit around its primary.

use orrery_types::prelude::{BodyIndex, KeplerianElements, StateVector};
use tracing::warn;

use crate::{
    kepler::{self, KeplerError},
    units::{Angle, AngularVelocity, Ratio, Time},
    SimulationComponent,
};

#[derive(Debug, Clone, PartialEq)]
pub struct KeplerianBodyConfig {
    pub name: String,
    pub elements: KeplerianElements,

    /// The body revolved around. Root bodies have none; they are the fixed
    /// reference of their system and never propagate.
    pub primary: Option<BodyIndex>,
}

/// Mass and freshly propagated absolute state of a body's primary, copied
/// out of the body table before the dependent steps.
#[derive(Copy, Clone, Debug)]
pub struct PrimaryBody {
    pub mass_kg: f64,
    pub state: StateVector,
}

pub struct KeplerianBodyEnvironment {
    pub time_scale: Ratio,
    pub primary: Option<PrimaryBody>,
}

#[derive(Debug)]
pub struct KeplerianBody {
    config: KeplerianBodyConfig,

    /// Undefined until a primary is assigned; the body cannot propagate
    /// without it.
    mean_motion: Option<AngularVelocity>,

    /// Absolute state in the system reference frame, SI
    state: StateVector,

    /// Most recent propagation failure, if any. Cleared by the next
    /// successful step.
    last_error: Option<KeplerError>,
}

impl KeplerianBody {
    /// Mean motion stays undefined until `init` runs with the body's
    /// primary in the environment; the body cannot propagate before then.
    pub fn new(config: KeplerianBodyConfig) -> Self {
        Self {
            config,
            mean_motion: None,
            state: StateVector::default(),
            last_error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn mass_kg(&self) -> f64 {
        self.config.elements.mass_kg
    }

    pub fn elements(&self) -> &KeplerianElements {
        &self.config.elements
    }

    pub fn primary(&self) -> Option<BodyIndex> {
        self.config.primary
    }

    pub fn mean_motion(&self) -> Option<AngularVelocity> {
        self.mean_motion
    }

    /// Absolute state as of the last completed step
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn last_error(&self) -> Option<&KeplerError> {
        self.last_error.as_ref()
    }

    /// Where the orbit passes at `mean_anomaly`, relative to the primary [m].
    /// Used by orbit-outline consumers; the body's own anomaly is untouched.
    pub fn position_at_mean_anomaly(
        &self,
        primary_mass_kg: f64,
        mean_anomaly: Angle,
    ) -> Result<na::Vector3<f64>, KeplerError> {
        kepler::position_at_mean_anomaly(&self.config.elements, primary_mass_kg, mean_anomaly)
    }
}

impl<'a> SimulationComponent<'a> for KeplerianBody {
    type SharedState = ();
    type Environment = KeplerianBodyEnvironment;

    fn init(&mut self, env: &'a Self::Environment, _shared_state: &mut Self::SharedState) {
        if let Some(primary) = &env.primary {
            self.mean_motion = Some(kepler::mean_motion(&self.config.elements, primary.mass_kg));
        }
    }

    fn step(&mut self, dt: Time, env: &'a Self::Environment, _shared_state: &mut Self::SharedState) {
        let Some(primary) = &env.primary else {
            // Root reference of the system; it stays put at the frame origin
            self.state = StateVector::default();
            return;
        };

        let Some(mean_motion) = self.mean_motion else {
            // No mean motion established yet; propagating would be undefined
            warn!(body = %self.config.name, "Skipping body with no mean motion");
            return;
        };

        self.config.elements.mean_anomaly_deg = kepler::advance_mean_anomaly(
            Angle::from_degrees(self.config.elements.mean_anomaly_deg),
            mean_motion,
            dt,
            env.time_scale,
        )
        .as_degrees();

        match kepler::propagate(&self.config.elements, primary.mass_kg) {
            Ok(relative) => {
                self.state = StateVector::new(
                    primary.state.position + relative.position,
                    primary.state.velocity + relative.velocity,
                );
                self.last_error = None;
            }
            Err(e) => {
                // Keep the previous state rather than publishing a partially
                // iterated solution; the next step retries with the advanced
                // anomaly.
                warn!(body = %self.config.name, error = %e, "Propagation failed");
                self.last_error = Some(e);
            }
        }
    }
}
