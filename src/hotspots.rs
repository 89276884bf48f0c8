//! Hotspot clustering.
//!
//! Groups nearby reports into hotspots with a single greedy pass:
//! the first unvisited report (in input order) becomes a seed, and every
//! still-unvisited report within `radius_meters` of that seed joins its
//! cluster. Membership is measured from the seed only, so there is no
//! chaining through other members, and the result depends on input order.
//!
//! Each hotspot's risk score sums `decay × severity × confidence` over its
//! members, where decay halves every `half_life_days`. Scores are relative to
//! the evaluation time and must be recomputed rather than cached.
//!
//! Cost is O(n²) distance checks. Shard large datasets by a coarse
//! geographic bucket before calling.
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use skimmer_hotspots::{generate_hotspots_at, HotspotConfig, Location, ObservationType,
//!                        Report, ReportCategory};
//!
//! let now = Utc::now();
//! let reports = vec![
//!     Report::new("a", Location::new(40.7128, -74.0060), ReportCategory::Atm,
//!                 ObservationType::Overlay, now),
//!     Report::new("b", Location::new(40.7300, -73.9950), ReportCategory::StorePos,
//!                 ObservationType::Other, now),
//! ];
//! let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), now);
//! assert_eq!(hotspots.len(), 2);
//! assert_eq!(hotspots[0].risk_score, 1.0);
//! assert_eq!(hotspots[1].risk_score, 0.8);
//! ```

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{HotspotError, Result};
use crate::geo_utils::{centroid, haversine_distance};
use crate::{Hotspot, Report};

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Configuration for hotspot clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotspotConfig {
    /// Maximum distance from a cluster's seed report, in meters.
    /// Default: 200.0
    pub radius_meters: f64,

    /// Days for a report's risk contribution to halve.
    /// Default: 7.0
    pub half_life_days: f64,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            radius_meters: 200.0,
            half_life_days: 7.0,
        }
    }
}

impl HotspotConfig {
    /// Reject radii and half-lives that are non-finite or not positive.
    pub fn validate(&self) -> Result<()> {
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(HotspotError::ConfigError {
                message: format!("radius_meters must be positive, got {}", self.radius_meters),
            });
        }
        if !self.half_life_days.is_finite() || self.half_life_days <= 0.0 {
            return Err(HotspotError::ConfigError {
                message: format!(
                    "half_life_days must be positive, got {}",
                    self.half_life_days
                ),
            });
        }
        Ok(())
    }

    /// Half-life in milliseconds.
    pub fn half_life_ms(&self) -> f64 {
        self.half_life_days * MS_PER_DAY
    }
}

/// Exponential half-life decay: `0.5 ^ (age / half_life)`.
///
/// Ages below zero (reports timestamped in the future) yield factors above 1.
#[inline]
pub fn decay_factor(age_ms: f64, half_life_ms: f64) -> f64 {
    0.5_f64.powf(age_ms / half_life_ms)
}

/// One report's contribution to its hotspot's risk score at `now`.
pub fn risk_contribution(report: &Report, now: DateTime<Utc>, half_life_ms: f64) -> f64 {
    let age_ms = (now - report.timestamp).num_milliseconds() as f64;
    decay_factor(age_ms, half_life_ms) * report.category.severity() * report.confidence()
}

/// Generate hotspots using the current wall-clock time.
pub fn generate_hotspots(reports: &[Report], config: &HotspotConfig) -> Vec<Hotspot> {
    generate_hotspots_at(reports, config, Utc::now())
}

/// Generate hotspots with decay anchored at `now`.
///
/// Output is sorted by descending risk score. Ties keep cluster discovery
/// order.
pub fn generate_hotspots_at(
    reports: &[Report],
    config: &HotspotConfig,
    now: DateTime<Utc>,
) -> Vec<Hotspot> {
    if reports.is_empty() {
        return vec![];
    }

    let radius = config.radius_meters;
    let clusters = seed_clusters(reports.len(), |seed, visited| {
        let origin = &reports[seed].location;
        (seed + 1..reports.len())
            .filter(|&j| !visited[j] && haversine_distance(origin, &reports[j].location) <= radius)
            .collect()
    });

    finish(reports, clusters, config, now)
}

/// Generate hotspots with each seed's distance scan run in parallel.
///
/// Membership assignment stays sequential, so the output is identical to
/// [`generate_hotspots_at`].
#[cfg(feature = "parallel")]
pub fn generate_hotspots_parallel(
    reports: &[Report],
    config: &HotspotConfig,
    now: DateTime<Utc>,
) -> Vec<Hotspot> {
    use rayon::prelude::*;

    if reports.is_empty() {
        return vec![];
    }

    let radius = config.radius_meters;
    let clusters = seed_clusters(reports.len(), |seed, visited| {
        let origin = &reports[seed].location;
        (seed + 1..reports.len())
            .into_par_iter()
            .filter(|&j| !visited[j] && haversine_distance(origin, &reports[j].location) <= radius)
            .collect()
    });

    finish(reports, clusters, config, now)
}

/// Greedy seed clustering over report indices.
///
/// Every report before the current seed is already visited, so `scan` only
/// needs to look at later indices. It must return them in ascending order.
/// The seed always belongs to its own cluster, which keeps the result a
/// partition even for a degenerate radius.
fn seed_clusters<F>(count: usize, scan: F) -> Vec<Vec<usize>>
where
    F: Fn(usize, &[bool]) -> Vec<usize>,
{
    let mut visited = vec![false; count];
    let mut clusters = Vec::new();

    for seed in 0..count {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let mut members = vec![seed];
        members.extend(scan(seed, &visited));
        for &idx in &members[1..] {
            visited[idx] = true;
        }
        clusters.push(members);
    }

    clusters
}

fn finish(
    reports: &[Report],
    clusters: Vec<Vec<usize>>,
    config: &HotspotConfig,
    now: DateTime<Utc>,
) -> Vec<Hotspot> {
    let half_life_ms = config.half_life_ms();

    let mut hotspots: Vec<Hotspot> = clusters
        .iter()
        .map(|members| build_hotspot(reports, members, config.radius_meters, half_life_ms, now))
        .collect();

    // Stable: equal scores keep discovery order
    hotspots.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));

    debug!(
        "[Hotspots] {} reports -> {} hotspots (radius {}m, half-life {}d)",
        reports.len(),
        hotspots.len(),
        config.radius_meters,
        config.half_life_days
    );

    hotspots
}

fn build_hotspot(
    reports: &[Report],
    members: &[usize],
    radius: f64,
    half_life_ms: f64,
    now: DateTime<Utc>,
) -> Hotspot {
    let seed = &reports[members[0]];
    let locations: Vec<_> = members.iter().map(|&i| reports[i].location).collect();
    let center = centroid(&locations).unwrap_or(seed.location);

    let score: f64 = members
        .iter()
        .map(|&i| risk_contribution(&reports[i], now, half_life_ms))
        .sum();

    let last_report_timestamp = members
        .iter()
        .map(|&i| reports[i].timestamp)
        .max()
        .unwrap_or(now);

    Hotspot {
        id: seed.id.clone(),
        center,
        radius,
        risk_score: round3(score),
        report_count: members.len() as u32,
        last_report_timestamp,
        report_ids: members.iter().map(|&i| reports[i].id.clone()).collect(),
    }
}

#[inline]
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, ObservationType, ReportCategory};
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn report(id: &str, lat: f64, lon: f64, age: Duration) -> Report {
        Report::new(
            id,
            Location::new(lat, lon),
            ReportCategory::Atm,
            ObservationType::Overlay,
            fixed_now() - age,
        )
    }

    /// Offset a latitude northwards by `meters`.
    fn north(lat: f64, meters: f64) -> f64 {
        lat + meters / (crate::geo_utils::EARTH_RADIUS_M * std::f64::consts::PI / 180.0)
    }

    #[test]
    fn test_empty_input() {
        assert!(generate_hotspots_at(&[], &HotspotConfig::default(), fixed_now()).is_empty());
    }

    #[test]
    fn test_nearby_reports_form_one_hotspot() {
        let reports = vec![
            report("a", 40.7128, -74.0060, Duration::zero()),
            report("b", north(40.7128, 50.0), -74.0060, Duration::hours(1)),
        ];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].id, "a");
        assert_eq!(hotspots[0].report_count, 2);
        assert_eq!(hotspots[0].report_ids, vec!["a", "b"]);
        assert_eq!(hotspots[0].radius, 200.0);
        assert_eq!(hotspots[0].last_report_timestamp, fixed_now());
    }

    #[test]
    fn test_no_chaining_through_members() {
        // b is 150m from a, c is 150m from b but 300m from a
        let lat = 40.0;
        let reports = vec![
            report("a", lat, 10.0, Duration::zero()),
            report("b", north(lat, 150.0), 10.0, Duration::zero()),
            report("c", north(lat, 300.0), 10.0, Duration::zero()),
        ];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());

        assert_eq!(hotspots.len(), 2);
        assert_eq!(hotspots[0].report_ids, vec!["a", "b"]);
        assert_eq!(hotspots[1].report_ids, vec!["c"]);
    }

    #[test]
    fn test_membership_depends_on_input_order() {
        let lat = 40.0;
        let a = report("a", lat, 10.0, Duration::zero());
        let b = report("b", north(lat, 150.0), 10.0, Duration::zero());
        let c = report("c", north(lat, 300.0), 10.0, Duration::zero());

        // Seeding from b captures both neighbours
        let hotspots =
            generate_hotspots_at(&[b, a, c], &HotspotConfig::default(), fixed_now());
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].report_ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_members_need_not_be_within_radius_of_each_other() {
        // a and c are 380m apart but both within 190m of the seed
        let lat = 40.0;
        let reports = vec![
            report("seed", lat, 10.0, Duration::zero()),
            report("a", north(lat, 190.0), 10.0, Duration::zero()),
            report("c", north(lat, -190.0), 10.0, Duration::zero()),
        ];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].report_count, 3);
    }

    #[test]
    fn test_decay_halves_at_half_life() {
        let reports = vec![report("a", 0.0, 0.0, Duration::days(7))];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());
        assert_eq!(hotspots[0].risk_score, 0.5);

        let config = HotspotConfig {
            half_life_days: 14.0,
            ..Default::default()
        };
        let reports = vec![report("a", 0.0, 0.0, Duration::days(28))];
        let hotspots = generate_hotspots_at(&reports, &config, fixed_now());
        assert_eq!(hotspots[0].risk_score, 0.25);
    }

    #[test]
    fn test_decay_is_monotonic() {
        let mut previous = f64::INFINITY;
        for hours in [0, 1, 12, 48, 200, 1000] {
            let age_ms = Duration::hours(hours).num_milliseconds() as f64;
            let factor = decay_factor(age_ms, HotspotConfig::default().half_life_ms());
            assert!(factor < previous, "decay not decreasing at {}h", hours);
            previous = factor;
        }
        assert_eq!(decay_factor(0.0, 1.0), 1.0);
    }

    #[test]
    fn test_severity_and_confidence_weighting() {
        let mut pos = report("pos", 0.0, 0.0, Duration::zero());
        pos.category = ReportCategory::StorePos;
        let pos = pos.with_confidence(0.5);

        let hotspots = generate_hotspots_at(&[pos], &HotspotConfig::default(), fixed_now());
        assert_eq!(hotspots[0].risk_score, 0.4);
    }

    #[test]
    fn test_sorted_by_risk_with_stable_ties() {
        let reports = vec![
            report("old", 10.0, 10.0, Duration::days(14)),
            report("tie-1", 20.0, 20.0, Duration::zero()),
            report("tie-2", 30.0, 30.0, Duration::zero()),
            report("pair-1", 40.0, 40.0, Duration::zero()),
            report("pair-2", 40.0, 40.0, Duration::zero()),
        ];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());
        let ids: Vec<&str> = hotspots.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["pair-1", "tie-1", "tie-2", "old"]);
        assert_eq!(hotspots[0].risk_score, 2.0);
        assert_eq!(hotspots[3].risk_score, 0.25);
    }

    #[test]
    fn test_centroid_and_last_timestamp() {
        let reports = vec![
            report("a", 40.0000, 10.0000, Duration::days(2)),
            report("b", 40.0010, 10.0010, Duration::days(1)),
        ];
        let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), fixed_now());
        assert_eq!(hotspots.len(), 1);
        let h = &hotspots[0];
        assert!((h.center.latitude - 40.0005).abs() < 1e-9);
        assert!((h.center.longitude - 10.0005).abs() < 1e-9);
        assert_eq!(h.last_report_timestamp, fixed_now() - Duration::days(1));
    }

    #[test]
    fn test_config_validation() {
        assert!(HotspotConfig::default().validate().is_ok());
        let bad = HotspotConfig {
            radius_meters: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(HotspotError::ConfigError { .. })));
        let bad = HotspotConfig {
            half_life_days: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_partial_json() {
        let config: HotspotConfig = serde_json::from_str(r#"{ "radiusMeters": 500 }"#).unwrap();
        assert_eq!(config.radius_meters, 500.0);
        assert_eq!(config.half_life_days, 7.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let reports: Vec<Report> = (0..60)
            .map(|i| {
                report(
                    &format!("r-{}", i),
                    north(40.0, (i % 13) as f64 * 90.0),
                    10.0 + (i % 5) as f64 * 0.001,
                    Duration::hours(i),
                )
            })
            .collect();
        let config = HotspotConfig::default();
        assert_eq!(
            generate_hotspots_at(&reports, &config, fixed_now()),
            generate_hotspots_parallel(&reports, &config, fixed_now())
        );
    }
}
