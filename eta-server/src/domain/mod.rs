//! Domain types for station lookup and arrival estimates.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod arrival;
mod code;
mod coordinate;
mod line;
mod station;

pub use arrival::{ArrivalRecord, DirectionArrival};
pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinate, distance_km};
pub use line::{InvalidLineCode, LineCode};
pub use station::{InvalidStationCode, StationCode};
