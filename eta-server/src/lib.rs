//! Nearest-station arrival estimates for the Hong Kong MTR.
//!
//! Resolves a position to the nearest station from a static catalog, works
//! out which lines serve it, and turns the MTR Next Train API response into
//! a destination and a whole-minute ETA per direction.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod schedule;
pub mod session;
pub mod transit;
pub mod web;
