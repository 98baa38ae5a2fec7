//! Seam to the presentation layer.
//!
//! The core only ever pushes marker positions through a caller-supplied
//! projection; it never depends on how (or whether) they are drawn.

use na::Vector3;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub type SharedViewState = Rc<RefCell<ViewState>>;

/// Maps a simulation-space position [km] into display space.
pub trait Projection {
    fn world_to_display(&self, position_km: Vector3<f64>) -> Vector3<f64>;
}

/// For consumers that render directly in simulation space
#[derive(Debug, Default)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn world_to_display(&self, position_km: Vector3<f64>) -> Vector3<f64> {
        position_km
    }
}

pub struct ViewState {
    projection: Box<dyn Projection>,
    markers: HashMap<String, Vector3<f64>>,
}

impl ViewState {
    pub fn new_shared(projection: Box<dyn Projection>) -> SharedViewState {
        Rc::new(RefCell::new(Self::new(projection)))
    }

    pub fn new(projection: Box<dyn Projection>) -> Self {
        Self {
            projection,
            markers: HashMap::new(),
        }
    }

    pub fn place_marker(&mut self, name: &str, position_km: Vector3<f64>) {
        let display = self.projection.world_to_display(position_km);
        self.markers.insert(name.to_string(), display);
    }

    pub fn remove_marker(&mut self, name: &str) {
        self.markers.remove(name);
    }

    pub fn marker(&self, name: &str) -> Option<Vector3<f64>> {
        self.markers.get(name).copied()
    }

    pub fn markers(&self) -> impl Iterator<Item = (&str, &Vector3<f64>)> {
        self.markers.iter().map(|(k, v)| (k.as_str(), v))
    }
}
