//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::Serialize;

/// Equatorial Earth radius in kilometres (WGS 84 semi-major axis).
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Error returned when a latitude/longitude pair is not a valid position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    reason: &'static str,
}

/// A position in decimal degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; both are
/// finite. Construction through [`Coordinate::new`] enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating ranges.
    ///
    /// ```
    /// use eta_server::domain::Coordinate;
    ///
    /// assert!(Coordinate::new(22.2975, 114.1722).is_ok());
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometres.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]. The result is
/// rounded to 4 decimal places so that comparisons between stations are
/// reproducible.
///
/// ```
/// use eta_server::domain::{Coordinate, distance_km};
///
/// let a = Coordinate::new(22.3193, 114.1694).unwrap();
/// let b = Coordinate::new(22.2783, 114.1747).unwrap();
/// assert!((distance_km(&a, &b) - 4.5966).abs() < 1e-9);
/// assert_eq!(distance_km(&a, &a), 0.0);
/// ```
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    // Guard against h drifting just above 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round4(EARTH_RADIUS_KM * c)
}

fn round4(km: f64) -> f64 {
    (km * 10_000.0).round() / 10_000.0
}
