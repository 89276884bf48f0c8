//! Site quantization.
//!
//! A site is a location rounded to 4 decimal places (~11 m at the equator).
//! Reports sharing a [`SiteKey`] corroborate each other in the confirmation
//! evaluator. This is independent of hotspot clustering, which groups by
//! radius in meters.

use std::fmt;

use crate::Location;

/// Quantization scale: 4 decimal places.
const SITE_SCALE: f64 = 10_000.0;

/// Composite integer key for a quantized location.
///
/// Each coordinate is stored as an integer count of 1e-4 degrees, which
/// avoids comparing formatted floating-point strings.
///
/// # Example
/// ```
/// use skimmer_hotspots::{Location, SiteKey};
///
/// let a = SiteKey::from_location(&Location::new(10.123456, -20.987654));
/// let b = SiteKey::from_location(&Location::new(10.123459, -20.987651));
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "10.1235,-20.9877");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey {
    pub lat_e4: i64,
    pub lon_e4: i64,
}

impl SiteKey {
    /// Quantize a location. Halves round toward positive infinity.
    pub fn from_location(loc: &Location) -> Self {
        Self {
            lat_e4: quantize(loc.latitude),
            lon_e4: quantize(loc.longitude),
        }
    }

    /// The location at the center of this site.
    pub fn center(&self) -> Location {
        Location::new(
            self.lat_e4 as f64 / SITE_SCALE,
            self.lon_e4 as f64 / SITE_SCALE,
        )
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.lat_e4)?;
        write!(f, ",")?;
        write_fixed(f, self.lon_e4)
    }
}

#[inline]
fn quantize(value: f64) -> i64 {
    round_half_up(value * SITE_SCALE)
}

#[inline]
fn round_half_up(scaled: f64) -> i64 {
    (scaled + 0.5).floor() as i64
}

fn write_fixed(f: &mut fmt::Formatter<'_>, value: i64) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{:04}", sign, abs / 10_000, abs % 10_000)
}

/// Round a location to `decimals` places before publishing it.
///
/// Three decimals (~110 m) is what public map views use, so an exact
/// reporter position is never exposed.
pub fn fuzz_location(loc: &Location, decimals: u32) -> Location {
    let factor = 10f64.powi(decimals as i32);
    let round = |v: f64| (v * factor).round() / factor;
    Location::new(round(loc.latitude), round(loc.longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_beyond_fourth_decimal_is_same_site() {
        let a = SiteKey::from_location(&Location::new(40.71280001, -74.00600002));
        let b = SiteKey::from_location(&Location::new(40.71279999, -74.00599998));
        assert_eq!(a, b);
        assert_eq!(a.lat_e4, 407_128);
        assert_eq!(a.lon_e4, -740_060);
    }

    #[test]
    fn test_fourth_decimal_difference_is_different_site() {
        let a = SiteKey::from_location(&Location::new(10.1234, 20.0));
        let b = SiteKey::from_location(&Location::new(10.1235, 20.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_negative_half_rounds_up() {
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(-1.5), -1);
        assert_eq!(round_half_up(-1.51), -2);
    }

    #[test]
    fn test_display_and_center() {
        let key = SiteKey::from_location(&Location::new(-0.00012, 5.5));
        assert_eq!(key.to_string(), "-0.0001,5.5000");
        let center = key.center();
        assert!((center.latitude + 0.0001).abs() < 1e-12);
        assert!((center.longitude - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_fuzz_location() {
        let fuzzed = fuzz_location(&Location::new(40.712812, -74.006049), 3);
        assert_eq!(fuzzed, Location::new(40.713, -74.006));
    }
}
