pub use crate::body::{BodyIndex, ShipIndex};
pub use crate::elements::KeplerianElements;
pub use crate::state::{OrbitalFrame, StateVector};
