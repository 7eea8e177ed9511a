//! Parking stays

pub mod model;

pub use model::{Concession, ParkingStay};
