extern crate nalgebra as na;

pub mod body;
pub mod elements;
pub mod prelude;
pub mod state;
