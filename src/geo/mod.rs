//! # Geographic Converter
//!
//! WGS84 geodetic coordinates to the scene's local Cartesian frame.
//!
//! Conversion goes through Earth-Centered Earth-Fixed (ECEF) coordinates,
//! whose Z axis runs through the poles. The scene is Y-up, so the final step
//! swaps ECEF Y and Z: `(x, y, z)_ecef -> (x, z, y)_scene`.
//!
//! All math is `f64`; positions on the ellipsoid are millions of meters from
//! the origin and lose centimeters in `f32`.

use cgmath::Vector3;

/// Semi-major (equatorial) axis in meters
pub const WGS84_A: f64 = 6_378_137.0;
/// Flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Semi-minor (polar) axis in meters
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// First eccentricity squared
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// A geodetic position: degrees, degrees, meters above the ellipsoid
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoCoord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoCoord {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Reads a `geoCoords`-style triple, honouring `longitude_first` ordering
    pub fn from_triple(v: Vector3<f64>, longitude_first: bool) -> Self {
        if longitude_first {
            Self::new(v.y, v.x, v.z)
        } else {
            Self::new(v.x, v.y, v.z)
        }
    }

    /// Earth-Centered Earth-Fixed position (Z through the north pole)
    pub fn to_ecef(self) -> Vector3<f64> {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();

        // Prime vertical radius of curvature
        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n + self.altitude) * cos_lat * lon.cos(),
            (n + self.altitude) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + self.altitude) * sin_lat,
        )
    }

    /// Position in the scene's Y-up frame
    pub fn to_local(self) -> Vector3<f64> {
        let ecef = self.to_ecef();
        Vector3::new(ecef.x, ecef.z, ecef.y)
    }
}

/// Converts latitude/longitude in degrees and altitude in meters to the
/// scene's Y-up Cartesian frame
pub fn geo_to_local(latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
    GeoCoord::new(latitude, longitude, altitude).to_local()
}
