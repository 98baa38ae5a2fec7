use std::path::Path;

use orrery_types::prelude::{KeplerianElements, StateVector};
use tracing::info;

use self::config::Config;
use crate::{
    planet::KeplerianBodyConfig,
    ship::{ShipConfig, DEFAULT_PATH_CAPACITY, DEFAULT_PATH_STEP},
    units::{Ratio, Time},
};

pub mod config;
pub mod nominal;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub time_scale: Ratio,

    /// Body table in primary-resolution order: a body's `primary` is an
    /// index into this vec
    pub bodies: Vec<KeplerianBodyConfig>,

    pub ships: Vec<ShipConfig>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(config: Option<P>) -> Self {
        if let Some(cfg_path) = config.as_ref() {
            info!(
                config = %cfg_path.as_ref().display(),
                "Loading scenario from config file",
            );
            Self::from_config(Config::load(cfg_path))
        } else {
            info!("Loading default nominal scenario");
            Self::nominal()
        }
    }

    pub fn nominal() -> Self {
        Self {
            name: "nominal".to_string(),
            time_scale: Ratio::from_f64(nominal::TIME_SCALE),
            bodies: nominal::bodies(),
            ships: nominal::ships(),
        }
    }

    pub fn from_config(cfg: Config) -> Self {
        let bodies = cfg
            .bodies
            .iter()
            .map(|body| {
                let primary = body.primary.as_ref().map(|primary_name| {
                    cfg.bodies
                        .iter()
                        .position(|b| &b.name == primary_name)
                        .expect("Config validation resolves primary names") as u64
                });
                KeplerianBodyConfig {
                    name: body.name.clone(),
                    elements: KeplerianElements {
                        mass_kg: body.mass,
                        eccentricity: body.eccentricity,
                        semimajor_axis_km: body.semimajor_axis,
                        inclination_deg: body.inclination,
                        ascending_node_deg: body.ascending_node,
                        arg_periapsis_deg: body.arg_periapsis,
                        mean_anomaly_deg: body.mean_anomaly,
                    },
                    primary,
                }
            })
            .collect();

        let ships = cfg
            .ships
            .iter()
            .map(|ship| ShipConfig {
                name: ship.name.clone(),
                initial_state: StateVector::new(
                    na::Vector3::new(ship.position[0], ship.position[1], ship.position[2]) * 1000.0,
                    na::Vector3::new(ship.velocity[0], ship.velocity[1], ship.velocity[2]) * 1000.0,
                ),
                path_capacity: ship.path_capacity.unwrap_or(DEFAULT_PATH_CAPACITY),
                path_step: ship
                    .path_step
                    .map(Time::from_secs)
                    .unwrap_or(DEFAULT_PATH_STEP),
            })
            .collect();

        Self {
            name: cfg.name.unwrap_or_else(|| "unnamed".to_string()),
            time_scale: Ratio::from_f64(cfg.time_scale.unwrap_or(1.0)),
            bodies,
            ships,
        }
    }
}
