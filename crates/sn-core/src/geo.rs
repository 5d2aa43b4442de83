//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Snapshot coordinates arrive
//! with 7 decimal places and radius clustering compares distances against
//! user-supplied thresholds, so single precision would visibly round.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of latitude on the haversine sphere.
pub const METRES_PER_DEG_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`GeoPoint::new`] but rejects non-finite values and coordinates
    /// outside ±90° latitude or ±180° longitude.
    pub fn checked(lat: f64, lon: f64) -> CoreResult<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Half-extents `(lat_deg, lon_deg)` of a box that contains every point
    /// within `radius_m` of `self`, or `None` when the box would wrap a pole
    /// or the antimeridian and callers must fall back to a full scan.
    ///
    /// The extents are padded by 10 % so floating-point error in the
    /// conversion never excludes a point the exact haversine test accepts.
    pub fn radius_envelope(self, radius_m: f64) -> Option<(f64, f64)> {
        let half_lat = radius_m / METRES_PER_DEG_LAT * 1.1;
        let max_abs_lat = self.lat.abs() + half_lat;
        if max_abs_lat >= 89.0 {
            return None;
        }
        // Parallels shrink with latitude; size the box at the widest point.
        let half_lon = half_lat / max_abs_lat.to_radians().cos();
        if self.lon.abs() + half_lon >= 180.0 {
            return None;
        }
        Some((half_lat, half_lon))
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
