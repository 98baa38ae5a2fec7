//! Built-in Sol/Earth/Luna-like scenario used when no file is supplied.

use orrery_types::prelude::{KeplerianElements, StateVector};

use crate::planet::KeplerianBodyConfig;
use crate::ship::{ShipConfig, DEFAULT_PATH_CAPACITY, DEFAULT_PATH_STEP};

pub const TIME_SCALE: f64 = 100.0;

pub fn bodies() -> Vec<KeplerianBodyConfig> {
    vec![
        KeplerianBodyConfig {
            name: "sol".to_string(),
            elements: KeplerianElements {
                mass_kg: 1.989e30,
                eccentricity: 0.0,
                semimajor_axis_km: 1.0,
                inclination_deg: 0.0,
                ascending_node_deg: 0.0,
                arg_periapsis_deg: 0.0,
                mean_anomaly_deg: 0.0,
            },
            primary: None,
        },
        KeplerianBodyConfig {
            name: "earth".to_string(),
            elements: KeplerianElements {
                mass_kg: 5.972e24,
                eccentricity: 0.0167,
                semimajor_axis_km: 1.495979e8,
                inclination_deg: 0.0,
                ascending_node_deg: 0.0,
                arg_periapsis_deg: 102.9,
                mean_anomaly_deg: 358.6,
            },
            primary: Some(0),
        },
        KeplerianBodyConfig {
            name: "luna".to_string(),
            elements: KeplerianElements {
                mass_kg: 7.342e22,
                eccentricity: 0.0549,
                semimajor_axis_km: 384_400.0,
                inclination_deg: 5.145,
                ascending_node_deg: 125.08,
                arg_periapsis_deg: 318.15,
                mean_anomaly_deg: 115.36,
            },
            primary: Some(1),
        },
    ]
}

pub fn ships() -> Vec<ShipConfig> {
    vec![ShipConfig {
        name: "wanderer".to_string(),
        // Drifting sunward of Earth's orbit with roughly orbital speed
        initial_state: StateVector::new(
            na::Vector3::new(1.47e11, 0.0, 0.0),
            na::Vector3::new(0.0, 3.1e4, 0.0),
        ),
        path_capacity: DEFAULT_PATH_CAPACITY,
        path_step: DEFAULT_PATH_STEP,
    }]
}
