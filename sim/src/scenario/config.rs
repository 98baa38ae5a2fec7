//! On-disk scenario description.
//!
//! Masses are kg, distances km, velocities km/s, angles degrees; the
//! scenario layer converts to SI when it builds component configs.

use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub name: Option<String>,

    /// Simulation multiplier applied to mean-anomaly advance and free-body
    /// real-time advance
    pub time_scale: Option<f64>,

    #[serde(alias = "body")]
    pub bodies: Vec<Body>,

    #[serde(alias = "ship")]
    pub ships: Vec<Ship>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Body {
    pub name: String,

    /// Mass [kg]
    pub mass: f64,

    /// Name of the body this one orbits; omitted for the system root
    pub primary: Option<String>,

    pub eccentricity: f64,

    /// Semimajor axis [km]
    pub semimajor_axis: f64,

    /// Inclination [deg]
    pub inclination: f64,

    /// Longitude of the ascending node [deg]
    pub ascending_node: f64,

    /// Argument of periapsis [deg]
    pub arg_periapsis: f64,

    /// Mean anomaly at epoch [deg]
    pub mean_anomaly: f64,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Ship {
    pub name: String,

    /// Initial position [km]
    pub position: [f64; 3],

    /// Initial velocity [km/s]
    pub velocity: [f64; 3],

    /// Prediction buffer entries; the built-in default when omitted
    pub path_capacity: Option<usize>,

    /// Simulated seconds between prediction buffer entries
    pub path_step: Option<f64>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let content = fs::read_to_string(path).expect("Failed to read scenario file");
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Self {
        let cfg: Config = toml::from_str(s).expect("Failed to parse scenario file");

        let mut names = HashSet::new();
        for name in cfg.bodies.iter().map(|b| &b.name) {
            if !names.insert(name) {
                panic!("Duplicate scenario entry for body '{name}'");
            }
        }

        names.clear();
        for name in cfg.ships.iter().map(|s| &s.name) {
            if !names.insert(name) {
                panic!("Duplicate scenario entry for ship '{name}'");
            }
        }

        for body in cfg.bodies.iter() {
            if let Some(primary) = &body.primary {
                if !cfg.bodies.iter().any(|b| &b.name == primary) {
                    panic!(
                        "Body '{}' orbits '{}' which is not in the scenario",
                        body.name, primary
                    );
                }
            }
        }

        cfg
    }
}
