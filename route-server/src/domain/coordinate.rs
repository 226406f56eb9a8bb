//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when constructing a coordinate outside WGS84 bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS84 position in decimal degrees.
///
/// Latitude is always within `[-90, 90]` and longitude within
/// `[-180, 180]`; both are finite. This type guarantees that any
/// `Coordinate` value is valid by construction.
///
/// # Examples
///
/// ```
/// use route_server::domain::Coordinate;
///
/// let bern = Coordinate::new(46.9480, 7.4474).unwrap();
/// assert_eq!(bern.latitude(), 46.9480);
///
/// assert!(Coordinate::new(91.0, 7.0).is_err());
/// assert!(Coordinate::new(46.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the WGS84 bounds.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite"));
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

    /// Great-circle distance to `other` in meters (haversine formula).
    ///
    /// ```
    /// use route_server::domain::Coordinate;
    ///
    /// let a = Coordinate::new(46.9480, 7.4474).unwrap();
    /// let b = Coordinate::new(46.9500, 7.4600).unwrap();
    /// let d = a.distance_m(&b);
    /// assert!((d - 983.0).abs() < 5.0);
    /// ```
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Arithmetic midpoint of two coordinates.
    ///
    /// Good enough at city scale; not a great-circle midpoint.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }

    /// True if both components differ by at most `tolerance_deg`.
    pub fn approx_eq(&self, other: &Coordinate, tolerance_deg: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance_deg
            && (self.longitude - other.longitude).abs() <= tolerance_deg
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(100.0, 7.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate (100, 7): latitude must be within [-90, 90]"
        );
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = coord(46.9480, 7.4474);
        assert_eq!(a.distance_m(&a), 0.0);
    }

    #[test]
    fn distance_one_degree_latitude() {
        // One degree of latitude is ~111.2 km on a 6371 km sphere
        let a = coord(46.0, 7.0);
        let b = coord(47.0, 7.0);
        assert!((a.distance_m(&b) - 111_195.0).abs() < 10.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(46.9480, 7.4474);
        let b = coord(46.9511, 7.4386);
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1e-9);
    }

    #[test]
    fn midpoint_and_display() {
        let a = coord(46.0, 7.0);
        let b = coord(47.0, 8.0);
        let m = a.midpoint(&b);
        assert_eq!(m, coord(46.5, 7.5));
        assert_eq!(m.to_string(), "46.5,7.5");
        assert_eq!(format!("{:?}", m), "Coordinate(46.5, 7.5)");
    }

    #[test]
    fn approx_eq_tolerance() {
        let a = coord(46.948, 7.4474);
        let b = coord(46.948_005, 7.447_405);
        assert!(a.approx_eq(&b, 1e-5));
        assert!(!a.approx_eq(&coord(46.9481, 7.4474), 1e-5));
    }
}
