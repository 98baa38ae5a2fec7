//! The whole simulation: the Keplerian body table, the gravity registry,
//! and the free bodies flying through it.

use std::collections::HashMap;

use orrery_types::prelude::{BodyIndex, ShipIndex, StateVector};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    gravity::GravityField,
    planet::{KeplerianBody, KeplerianBodyConfig, KeplerianBodyEnvironment, PrimaryBody},
    registry::{BodyRegistry, GravitySource},
    scenario::Scenario,
    ship::{Ship, ShipConfig, ShipEnvironment},
    units::{Ratio, Time},
    viz::SharedViewState,
    SimulationComponent,
};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("body '{body}' names primary index {primary} which is not in the body table")]
    UnknownPrimary { body: String, primary: BodyIndex },

    #[error("body '{body}' is transitively its own primary")]
    CyclicHierarchy { body: String },

    #[error("body '{body}' has invalid elements: {reason}")]
    InvalidElements { body: String, reason: String },
}

/// State shared with external consumers; the view seam is optional and the
/// physics never depends on it.
#[derive(Default)]
pub struct SystemSharedState {
    pub view: Option<SharedViewState>,
}

impl SystemSharedState {
    pub fn new(view: Option<SharedViewState>) -> Self {
        Self { view }
    }
}

/// Owns every body and the gravity registry. One `tick` runs to completion
/// before any consumer observes updated state, and all Keplerian bodies are
/// propagated before any free body's gravity evaluation. Body and ship
/// creation/destruction go through `&mut self` methods and therefore can
/// never interleave with a tick.
#[derive(Debug)]
pub struct System {
    bodies: HashMap<BodyIndex, KeplerianBody>,
    next_body_index: BodyIndex,

    /// Body indices sorted primary-before-dependent, so dependents read
    /// freshly propagated primary states
    propagation_order: Vec<BodyIndex>,

    ships: HashMap<ShipIndex, Ship>,
    next_ship_index: ShipIndex,

    registry: BodyRegistry,
    time_scale: Ratio,
}

impl System {
    pub fn new(scenario: Scenario) -> Result<Self, SystemError> {
        validate_forest(&scenario.bodies)?;

        let mut bodies = HashMap::with_capacity(scenario.bodies.len());
        for (idx, config) in scenario.bodies.iter().enumerate() {
            let mut body = KeplerianBody::new(config.clone());
            let env = KeplerianBodyEnvironment {
                time_scale: scenario.time_scale,
                primary: config.primary.map(|p| PrimaryBody {
                    mass_kg: scenario.bodies[p as usize].elements.mass_kg,
                    state: StateVector::default(),
                }),
            };
            body.init(&env, &mut ());
            bodies.insert(idx as BodyIndex, body);
        }

        let propagation_order = depth_order(&scenario.bodies);

        let mut system = Self {
            next_body_index: bodies.len() as BodyIndex,
            bodies,
            propagation_order,
            ships: HashMap::new(),
            next_ship_index: 0,
            registry: BodyRegistry::new(),
            time_scale: scenario.time_scale,
        };

        // Settle initial states from the epoch anomalies, then seed the
        // registry: every body with a primary (and thus a mean motion)
        // becomes a gravity source.
        system.propagate_bodies(Time::from_secs(0.0));
        for (&idx, body) in system.bodies.iter() {
            if body.primary().is_some() {
                system.registry.register(
                    idx,
                    GravitySource {
                        mass_kg: body.mass_kg(),
                        position: body.state().position,
                    },
                );
            }
        }

        for ship_config in scenario.ships {
            system.ships.insert(system.next_ship_index, Ship::new(ship_config));
            system.next_ship_index += 1;
        }

        info!(
            scenario = %scenario.name,
            bodies = system.bodies.len(),
            gravity_sources = system.registry.len(),
            ships = system.ships.len(),
            "Simulation system constructed"
        );

        Ok(system)
    }

    pub fn time_scale(&self) -> Ratio {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: Ratio) {
        self.time_scale = time_scale;
    }

    pub fn body(&self, index: BodyIndex) -> Option<&KeplerianBody> {
        self.bodies.get(&index)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyIndex, &KeplerianBody)> {
        self.bodies.iter().map(|(&idx, b)| (idx, b))
    }

    pub fn ship(&self, index: ShipIndex) -> Option<&Ship> {
        self.ships.get(&index)
    }

    pub fn ships(&self) -> impl Iterator<Item = (ShipIndex, &Ship)> {
        self.ships.iter().map(|(&idx, s)| (idx, s))
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// One cooperative simulation step: propagate every Keplerian body, then
    /// advance every free body and refresh its prediction buffer, then place
    /// display markers.
    pub fn tick(&mut self, dt: Time, shared: &mut SystemSharedState) {
        self.propagate_bodies(dt);

        let gravity = GravityField::new(&self.registry);
        let env = ShipEnvironment {
            gravity,
            time_scale: self.time_scale,
        };
        for ship in self.ships.values_mut() {
            ship.step(dt, &env, &mut ());
        }

        if let Some(view) = shared.view.as_ref() {
            let mut view = view.borrow_mut();
            for body in self.bodies.values() {
                view.place_marker(body.name(), body.state().position_km());
            }
            for ship in self.ships.values() {
                view.place_marker(ship.name(), ship.state().position_km());
            }
        }
    }

    /// A body spawns against an already-present primary (or as a new root),
    /// settles its state from its epoch anomaly, and joins the gravity set
    /// before anything can query it.
    ///
    /// The new body cannot appear in any existing primary chain, so the
    /// forest property is preserved by construction; only its own elements
    /// and primary reference need checking.
    pub fn add_body(&mut self, config: KeplerianBodyConfig) -> Result<BodyIndex, SystemError> {
        validate_elements(&config)?;
        let primary = match config.primary {
            Some(p) => match self.bodies.get(&p) {
                Some(primary) => Some(PrimaryBody {
                    mass_kg: primary.mass_kg(),
                    state: *primary.state(),
                }),
                None => {
                    return Err(SystemError::UnknownPrimary {
                        body: config.name.clone(),
                        primary: p,
                    })
                }
            },
            None => None,
        };

        let index = self.next_body_index;
        self.next_body_index += 1;
        info!(body = %config.name, index, "Body created");

        let mut body = KeplerianBody::new(config);
        let env = KeplerianBodyEnvironment {
            time_scale: self.time_scale,
            primary,
        };
        body.init(&env, &mut ());
        body.step(Time::from_secs(0.0), &env, &mut ());

        if primary.is_some() {
            self.registry.register(
                index,
                GravitySource {
                    mass_kg: body.mass_kg(),
                    position: body.state().position,
                },
            );
        }
        self.bodies.insert(index, body);
        // Its primary already precedes it in the order, so appending keeps
        // primaries-before-dependents.
        self.propagation_order.push(index);
        Ok(index)
    }

    /// A ship spawns with its configured seed state and joins the next tick.
    pub fn add_ship(&mut self, config: ShipConfig) -> ShipIndex {
        let index = self.next_ship_index;
        self.next_ship_index += 1;
        info!(ship = %config.name, index, "Ship created");
        self.ships.insert(index, Ship::new(config));
        index
    }

    pub fn remove_ship(&mut self, index: ShipIndex, shared: &mut SystemSharedState) {
        if let Some(ship) = self.ships.remove(&index) {
            info!(ship = %ship.name(), index, "Ship destroyed");
            if let Some(view) = shared.view.as_ref() {
                view.borrow_mut().remove_marker(ship.name());
            }
        }
    }

    /// Destroying a body unregisters it from the gravity set synchronously,
    /// so no later query ever visits a stale source. Dependents that named it
    /// as primary stop propagating and keep their last state.
    pub fn remove_body(&mut self, index: BodyIndex, shared: &mut SystemSharedState) {
        if let Some(body) = self.bodies.remove(&index) {
            info!(body = %body.name(), index, "Body destroyed");
            self.registry.unregister(index);
            self.propagation_order.retain(|&idx| idx != index);
            if let Some(view) = shared.view.as_ref() {
                view.borrow_mut().remove_marker(body.name());
            }
        }
    }

    fn propagate_bodies(&mut self, dt: Time) {
        for i in 0..self.propagation_order.len() {
            let idx = self.propagation_order[i];

            let Some(body) = self.bodies.get(&idx) else {
                continue;
            };
            let primary = match body.primary() {
                Some(p) => match self.bodies.get(&p) {
                    Some(primary) => Some(PrimaryBody {
                        mass_kg: primary.mass_kg(),
                        state: *primary.state(),
                    }),
                    None => {
                        // The primary was destroyed; this body can no longer
                        // propagate and keeps its last state.
                        warn!(body = %body.name(), "Skipping body whose primary is gone");
                        continue;
                    }
                },
                None => None,
            };

            let env = KeplerianBodyEnvironment {
                time_scale: self.time_scale,
                primary,
            };
            let body = self.bodies.get_mut(&idx).expect("body table entry");
            body.step(dt, &env, &mut ());
            self.registry.update_position(idx, body.state().position);
        }
    }
}

/// Reject element sets outside the supported ranges.
fn validate_elements(config: &KeplerianBodyConfig) -> Result<(), SystemError> {
    let el = &config.elements;
    let invalid = |reason: String| SystemError::InvalidElements {
        body: config.name.clone(),
        reason,
    };
    if !(el.mass_kg > 0.0) {
        return Err(invalid(format!("mass {} kg must be > 0", el.mass_kg)));
    }
    if config.primary.is_some() {
        if !(el.eccentricity >= 0.0 && el.eccentricity < 1.0) {
            return Err(invalid(format!(
                "eccentricity {} outside [0, 1); only closed orbits are supported",
                el.eccentricity
            )));
        }
        if !(el.semimajor_axis_km > 0.0) {
            return Err(invalid(format!(
                "semimajor axis {} km must be > 0",
                el.semimajor_axis_km
            )));
        }
    }
    Ok(())
}

/// Reject tables where a body's primary chain leaves the table or loops
/// back on itself, and element sets outside the supported ranges.
fn validate_forest(configs: &[KeplerianBodyConfig]) -> Result<(), SystemError> {
    for config in configs {
        validate_elements(config)?;

        if let Some(primary) = config.primary {
            if primary as usize >= configs.len() {
                return Err(SystemError::UnknownPrimary {
                    body: config.name.clone(),
                    primary,
                });
            }
        }
    }

    for (idx, config) in configs.iter().enumerate() {
        let mut cursor = config.primary;
        let mut hops = 0;
        while let Some(p) = cursor {
            hops += 1;
            if hops > configs.len() {
                return Err(SystemError::CyclicHierarchy {
                    body: config.name.clone(),
                });
            }
            if p as usize == idx {
                return Err(SystemError::CyclicHierarchy {
                    body: config.name.clone(),
                });
            }
            cursor = configs[p as usize].primary;
        }
    }

    Ok(())
}

/// Indices sorted by depth in the primary forest, roots first
fn depth_order(configs: &[KeplerianBodyConfig]) -> Vec<BodyIndex> {
    let depth = |mut idx: usize| {
        let mut d = 0usize;
        while let Some(p) = configs[idx].primary {
            d += 1;
            idx = p as usize;
        }
        d
    };

    let mut order: Vec<BodyIndex> = (0..configs.len() as BodyIndex).collect();
    order.sort_by_key(|&idx| depth(idx as usize));
    order
}
