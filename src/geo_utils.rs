//! Geographic utilities: great-circle distance and centroid.

use geo::{Centroid, MultiPoint, Point};

use crate::Location;

/// Earth's radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two locations in meters.
///
/// # Example
/// ```
/// use skimmer_hotspots::Location;
/// use skimmer_hotspots::geo_utils::haversine_distance;
///
/// let london = Location::new(51.5074, -0.1278);
/// let paris = Location::new(48.8566, 2.3522);
/// let km = haversine_distance(&london, &paris) / 1000.0;
/// assert!((km - 343.5).abs() < 1.0);
/// ```
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Unweighted arithmetic mean of latitudes and longitudes.
///
/// Not a geodesic centroid; at hotspot-radius scale the difference is
/// negligible. Returns `None` for an empty slice.
pub fn centroid(locations: &[Location]) -> Option<Location> {
    let points: MultiPoint<f64> = locations
        .iter()
        .map(|&loc| Point::from(loc))
        .collect::<Vec<_>>()
        .into();
    points.centroid().map(Location::from)
}
